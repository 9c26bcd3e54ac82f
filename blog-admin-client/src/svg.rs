//! Предпросмотр SVG-файлов.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::{AdminClientError, AdminClientResult};

/// MIME-тип SVG.
pub const SVG_MIME: &str = "image/svg+xml";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Загруженный SVG-файл.
pub struct SvgPreview {
    /// Имя файла.
    pub file_name: String,
    /// Исходный текст.
    pub source: String,
    /// `data:`-ссылка для предпросмотра.
    pub data_url: String,
}

/// Принимает только SVG: по MIME-типу или по корневому тегу `<svg`.
pub fn load_svg(file_name: &str, mime: Option<&str>, bytes: &[u8]) -> AdminClientResult<SvgPreview> {
    let source = std::str::from_utf8(bytes)
        .map_err(|_| AdminClientError::InvalidRequest("svg file is not valid utf-8".to_string()))?;

    let mime_ok = mime.is_some_and(|mime| mime.eq_ignore_ascii_case(SVG_MIME));
    let looks_like_svg = mime.is_none() && has_svg_root(source);
    if !mime_ok && !looks_like_svg {
        return Err(AdminClientError::InvalidRequest(format!(
            "{file_name}: only {SVG_MIME} files are accepted"
        )));
    }

    Ok(SvgPreview {
        file_name: file_name.to_string(),
        source: source.to_string(),
        data_url: data_url(bytes),
    })
}

/// Угадывает MIME-тип по расширению файла.
pub fn mime_from_file_name(file_name: &str) -> Option<&'static str> {
    file_name
        .rsplit_once('.')
        .filter(|(_, ext)| ext.eq_ignore_ascii_case("svg"))
        .map(|_| SVG_MIME)
}

fn has_svg_root(source: &str) -> bool {
    let mut rest = source.trim_start_matches('\u{feff}').trim_start();
    // пропускаем XML-пролог, комментарии и DOCTYPE
    while rest.starts_with("<?") || rest.starts_with("<!") {
        match rest.find('>') {
            Some(end) => rest = rest[end + 1..].trim_start(),
            None => return false,
        }
    }
    rest.starts_with("<svg")
}

/// `data:image/svg+xml;base64,...` для байтов SVG.
pub fn data_url(bytes: &[u8]) -> String {
    format!("data:{SVG_MIME};base64,{}", STANDARD.encode(bytes))
}

/// Конвертация SVG в растровые форматы.
pub fn convert(_preview: &SvgPreview, format: &str) -> AdminClientResult<Vec<u8>> {
    Err(AdminClientError::InvalidRequest(format!(
        "conversion to {format} is not implemented"
    )))
}

//! 上传文件类型校验

/// 按扩展名登记的文件头签名，(偏移, 字节)
const SIGNATURES: &[(&[&str], &[(usize, &[u8])])] = &[
    (&[".png"], &[(0, &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])]),
    (&[".jpg", ".jpeg"], &[(0, &[0xFF, 0xD8, 0xFF])]),
    (&[".gif"], &[(0, b"GIF87a"), (0, b"GIF89a")]),
    (&[".webp"], &[(8, b"WEBP")]),
    (&[".pdf"], &[(0, b"%PDF")]),
    // OLE 复合文档
    (
        &[".doc", ".xls", ".ppt"],
        &[(0, &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])],
    ),
    // OOXML 与 zip 同为 PK 头
    (
        &[".docx", ".xlsx", ".pptx", ".zip"],
        &[(0, &[b'P', b'K', 0x03, 0x04])],
    ),
    (&[".rar"], &[(0, b"Rar!")]),
    (&[".7z"], &[(0, &[b'7', b'z', 0xBC, 0xAF, 0x27, 0x1C])]),
];

/// 纯文本类型没有固定文件头
const TEXT_EXTENSIONS: &[&str] = &[".txt", ".md", ".csv", ".json"];

/// 取出小写扩展名（含点号）
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_ascii_lowercase()))
}

/// 文件头是否与扩展名相符，未登记的扩展名一律拒绝
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    let extension = extension.to_ascii_lowercase();
    if TEXT_EXTENSIONS.contains(&extension.as_str()) {
        return !data.contains(&0);
    }

    SIGNATURES
        .iter()
        .find(|(exts, _)| exts.contains(&extension.as_str()))
        .map(|(_, patterns)| {
            patterns.iter().any(|(offset, magic)| {
                data.len() >= offset + magic.len() && &data[*offset..offset + magic.len()] == *magic
            })
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("notes.PDF"), Some(".pdf".to_string()));
        assert_eq!(file_extension("archive.tar.gz"), Some(".gz".to_string()));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension(".env"), None);
    }

    #[test]
    fn test_binary_signatures() {
        assert!(validate_magic_bytes(b"%PDF-1.7\n", ".pdf"));
        assert!(!validate_magic_bytes(b"%PDF-1.7\n", ".docx"));
        assert!(validate_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], ".JPG"));
        assert!(validate_magic_bytes(b"RIFF\x10\0\0\0WEBPVP8 ", ".webp"));
        assert!(!validate_magic_bytes(b"RIFF", ".webp"));
        assert!(validate_magic_bytes(b"PK\x03\x04rest", ".xlsx"));
    }

    #[test]
    fn test_text_and_unknown() {
        assert!(validate_magic_bytes(b"week,topic\n1,intro", ".csv"));
        assert!(!validate_magic_bytes(&[], ".txt"));
        assert!(!validate_magic_bytes(b"MZ\x90\0", ".exe"));
    }
}

use crate::error::KotabError;
use env_logger::{fmt::Color, Builder};
use log::{Level, LevelFilter};
use std::io::Write;
use std::path::Path;

/// Cell values that upstream annotation tables use for absent values
pub const NULL_VALUES: [&str; 9] = ["NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "<NA>"];

/// Extensions recognized as compression layers on input tables
const COMPRESSION_EXTENSIONS: [&str; 6] = ["gz", "bz", "bz2", "xz", "lzma", "zst"];

pub fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            let timestamp = buf.timestamp();

            let mut white_style = buf.style();
            white_style.set_color(Color::White).set_bold(false);

            let mut level_style = buf.style();
            match record.level() {
                Level::Error => level_style.set_color(Color::Red).set_bold(true),
                Level::Warn => level_style.set_color(Color::Rgb(255, 102, 0)).set_bold(true),
                Level::Info => level_style.set_color(Color::Green).set_bold(true),
                Level::Debug => level_style.set_color(Color::Rgb(255, 195, 0)).set_bold(true),
                Level::Trace => level_style.set_color(Color::White).set_bold(false),
            };

            let args_style = match record.level() {
                Level::Info | Level::Trace => &white_style,
                _ => &level_style,
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                white_style.value(timestamp),
                level_style.value(record.level()),
                args_style.value(record.args())
            )
        })
        .filter(None, LevelFilter::Info)
        .init();
}

/// Enum to specify the type of file component to retrieve
pub enum FileComponent {
    /// The full file name including the extension
    FileName,
    /// The file name without the extension
    FileStem,
}

/// Extracts the specified file component from a path and returns it as a `String`.
pub fn get_file_component(path: &Path, component: FileComponent) -> Result<String, KotabError> {
    let os_str = match component {
        FileComponent::FileName => path.file_name(),
        FileComponent::FileStem => path.file_stem(),
    };
    os_str
        .and_then(|s| s.to_str())
        .map(String::from)
        .ok_or(KotabError::FileNameConversionError)
}

/// Derives the sample identifier from an input table path
///
/// The compression extension is removed first (if any), followed by
/// the table extension: `reads/sample-1.tsv.gz` becomes `sample-1`.
pub fn sample_name_from_path(path: &Path) -> Result<String, KotabError> {
    let compressed = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| COMPRESSION_EXTENSIONS.contains(&ext))
        .unwrap_or(false);

    if compressed {
        let inner = Path::new(
            path.file_stem()
                .ok_or(KotabError::FileNameConversionError)?,
        );
        get_file_component(inner, FileComponent::FileStem)
    } else {
        get_file_component(path, FileComponent::FileStem)
    }
}

/// Converts empty and placeholder cells to `None`
pub fn null_if_placeholder(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() || NULL_VALUES.contains(&trimmed) {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn sample_name_plain_table_ok() {
        let path = PathBuf::from("data/Sample-1-gene-coverage-annotation-and-tax.tsv");
        assert_eq!(
            sample_name_from_path(&path).unwrap(),
            "Sample-1-gene-coverage-annotation-and-tax"
        );
    }

    #[test]
    fn sample_name_compressed_table_ok() {
        let path = PathBuf::from("data/sample_b.tsv.gz");
        assert_eq!(sample_name_from_path(&path).unwrap(), "sample_b");
    }

    #[test]
    fn sample_name_no_extension_ok() {
        let path = PathBuf::from("sample_c");
        assert_eq!(sample_name_from_path(&path).unwrap(), "sample_c");
    }

    #[test]
    fn file_component_name_ok() {
        let path = PathBuf::from("/some/path/to/file.txt");
        assert_eq!(get_file_component(&path, FileComponent::FileName).unwrap(), "file.txt");
        assert_eq!(get_file_component(&path, FileComponent::FileStem).unwrap(), "file");
    }

    #[test]
    fn null_placeholders_are_none() {
        for value in ["", "  ", "NA", "NaN", "nan", "N/A", "None", "<NA>"] {
            assert_eq!(null_if_placeholder(Some(value.to_string())), None, "{value}");
        }
        assert_eq!(null_if_placeholder(None), None);
    }

    #[test]
    fn null_placeholders_keep_values() {
        assert_eq!(
            null_if_placeholder(Some("K00001".to_string())),
            Some("K00001".to_string())
        );
        assert_eq!(
            null_if_placeholder(Some(" Bacteria ".to_string())),
            Some("Bacteria".to_string())
        );
    }
}

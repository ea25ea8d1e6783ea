use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default query cleanup
    fn process(&self, text: &str) -> String {
        let mut text = text.trim().to_string();

        if text.is_empty() {
            return text;
        }

        // Unicode normalization (NFKC), folds full-width forms
        text = text.nfkc().collect();

        text = text.replace(['\n', '\r'], " ");
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub struct QueryPreprocessor;
impl Preprocessor for QueryPreprocessor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_collapses() {
        assert_eq!(QueryPreprocessor.process("  buenos \n días \r\n"), "buenos días");
    }

    #[test]
    fn test_nfkc_folds_full_width() {
        assert_eq!(QueryPreprocessor.process("ｈｏｌａ"), "hola");
    }

    #[test]
    fn test_blank_is_empty() {
        assert_eq!(QueryPreprocessor.process(" \n\t "), "");
    }
}

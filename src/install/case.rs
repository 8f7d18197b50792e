//! File name case transforms.
//!
//! Only the stem is transformed; everything from the first `.` on is kept
//! as the extension (`data-table.test.tsx` keeps `.test.tsx`).

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToTitleCase, ToTrainCase,
    ToUpperCamelCase,
};
use serde::{Deserialize, Serialize};

/// Naming convention applied to installed file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStyle {
    /// `dataTable`
    Camel,
    /// `DataTable`
    Pascal,
    /// `data-table`
    Kebab,
    /// `data_table`
    Snake,
    /// `Data-Table`
    Train,
    /// `data.table`
    Dot,
    /// `data/table`
    Path,
    /// `Data table`
    Sentence,
    /// `Data Table`
    Capital,
    /// `DATA_TABLE`
    Constant,
    /// `Data_Table`
    PascalSnake,
}

type Transform = fn(&str) -> String;

static TRANSFORMS: &[(CaseStyle, Transform)] = &[
    (CaseStyle::Camel, <str as ToLowerCamelCase>::to_lower_camel_case),
    (CaseStyle::Pascal, <str as ToUpperCamelCase>::to_upper_camel_case),
    (CaseStyle::Kebab, <str as ToKebabCase>::to_kebab_case),
    (CaseStyle::Snake, <str as ToSnakeCase>::to_snake_case),
    (CaseStyle::Train, <str as ToTrainCase>::to_train_case),
    (CaseStyle::Dot, dot_case),
    (CaseStyle::Path, path_case),
    (CaseStyle::Sentence, sentence_case),
    (CaseStyle::Capital, <str as ToTitleCase>::to_title_case),
    (CaseStyle::Constant, <str as ToShoutySnakeCase>::to_shouty_snake_case),
    (CaseStyle::PascalSnake, pascal_snake_case),
];

impl CaseStyle {
    /// Every style, in declaration order.
    pub const ALL: [CaseStyle; 11] = [
        CaseStyle::Camel,
        CaseStyle::Pascal,
        CaseStyle::Kebab,
        CaseStyle::Snake,
        CaseStyle::Train,
        CaseStyle::Dot,
        CaseStyle::Path,
        CaseStyle::Sentence,
        CaseStyle::Capital,
        CaseStyle::Constant,
        CaseStyle::PascalSnake,
    ];

    /// Transform a bare identifier.
    pub fn apply(&self, input: &str) -> String {
        TRANSFORMS
            .iter()
            .find(|(style, _)| style == self)
            .map_or_else(|| input.to_string(), |(_, transform)| transform(input))
    }

    /// Transform a file name, preserving its extension.
    pub fn apply_to_file_name(&self, file_name: &str) -> String {
        if file_name.starts_with('.') {
            return file_name.to_string();
        }
        let (stem, extension) = split_extension(file_name);
        format!("{}{}", self.apply(stem), extension)
    }
}

/// Split at the first `.`.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.find('.') {
        Some(i) => file_name.split_at(i),
        None => (file_name, ""),
    }
}

fn join_words(input: &str, separator: &str, word: fn(&str) -> String) -> String {
    input
        .to_snake_case()
        .split('_')
        .filter(|w| !w.is_empty())
        .map(word)
        .collect::<Vec<_>>()
        .join(separator)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn dot_case(input: &str) -> String {
    join_words(input, ".", str::to_string)
}

fn path_case(input: &str) -> String {
    join_words(input, "/", str::to_string)
}

fn sentence_case(input: &str) -> String {
    capitalize(&join_words(input, " ", str::to_string))
}

fn pascal_snake_case(input: &str) -> String {
    join_words(input, "_", capitalize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_style_has_a_transform() {
        for style in CaseStyle::ALL {
            assert!(
                TRANSFORMS.iter().any(|(s, _)| *s == style),
                "missing transform for {:?}",
                style
            );
        }
    }

    #[test]
    fn transforms_from_kebab() {
        let cases = [
            (CaseStyle::Camel, "dataTable"),
            (CaseStyle::Pascal, "DataTable"),
            (CaseStyle::Kebab, "data-table"),
            (CaseStyle::Snake, "data_table"),
            (CaseStyle::Train, "Data-Table"),
            (CaseStyle::Dot, "data.table"),
            (CaseStyle::Path, "data/table"),
            (CaseStyle::Sentence, "Data table"),
            (CaseStyle::Capital, "Data Table"),
            (CaseStyle::Constant, "DATA_TABLE"),
            (CaseStyle::PascalSnake, "Data_Table"),
        ];

        for (style, expected) in cases {
            assert_eq!(style.apply("data-table"), expected, "{:?}", style);
        }
    }

    #[test]
    fn transforms_from_camel() {
        assert_eq!(CaseStyle::Kebab.apply("useMediaQuery"), "use-media-query");
        assert_eq!(CaseStyle::Snake.apply("useMediaQuery"), "use_media_query");
    }

    #[test]
    fn extension_is_preserved() {
        assert_eq!(
            CaseStyle::Pascal.apply_to_file_name("data-table.tsx"),
            "DataTable.tsx"
        );
        assert_eq!(
            CaseStyle::Snake.apply_to_file_name("date-picker.test.tsx"),
            "date_picker.test.tsx"
        );
    }

    #[test]
    fn dotfiles_are_left_alone() {
        assert_eq!(CaseStyle::Pascal.apply_to_file_name(".env"), ".env");
    }

    #[test]
    fn names_without_extension() {
        assert_eq!(CaseStyle::Constant.apply_to_file_name("my-file"), "MY_FILE");
    }

    #[test]
    fn deserializes_kebab_names() {
        let style: CaseStyle = serde_yaml::from_str("pascal-snake").unwrap();
        assert_eq!(style, CaseStyle::PascalSnake);
    }
}

use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 256;

/// Title of a published video or job posting.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ContentTitle(String);

impl ContentTitle {
    pub fn parse(title: String) -> Result<ContentTitle, String> {
        let title = title.trim().to_string();

        if title.is_empty() {
            return Err(String::from("title cannot be empty"));
        }

        if title.graphemes(true).count() > MAX_GRAPHEMES {
            return Err(format!("title is longer than {} characters", MAX_GRAPHEMES));
        }

        Ok(Self(title))
    }
}

impl AsRef<str> for ContentTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

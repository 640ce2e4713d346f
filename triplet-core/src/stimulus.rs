use serde::{Deserialize, Serialize};

const IMAGE_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];
const IMAGE_WIDTH_PX: u32 = 150;

/// Something a participant can pick on screen
pub trait Stimulus: Clone + Send + Sync + std::fmt::Debug {
    /// Identifier written to exported data
    fn label(&self) -> &str;
    fn is_image(&self) -> bool;
    /// Markup for the choice button wrapping this stimulus
    fn button_html(&self) -> String;
}

/// A choice item: a text label or an image reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Item {
    Text(String),
    Image(String),
}

impl Item {
    pub fn text(label: impl Into<String>) -> Self {
        Item::Text(label.into())
    }

    pub fn image(path: impl Into<String>) -> Self {
        Item::Image(path.into())
    }

    /// Classifies a raw identifier by its file extension.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let lower = raw.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            Item::Image(raw)
        } else {
            Item::Text(raw)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Item::Text(s) | Item::Image(s) => s,
        }
    }
}

impl Stimulus for Item {
    fn label(&self) -> &str {
        self.as_str()
    }

    fn is_image(&self) -> bool {
        matches!(self, Item::Image(_))
    }

    fn button_html(&self) -> String {
        match self {
            Item::Text(label) => format!(r#"<button class="jspsych-btn">{label}</button>"#),
            Item::Image(src) => format!(
                r#"<button class="jspsych-btn" style="border:none;background:none;padding:0;margin:0;"><img src="{src}" width="{IMAGE_WIDTH_PX}"></button>"#
            ),
        }
    }
}

impl From<String> for Item {
    fn from(raw: String) -> Self {
        Item::parse(raw)
    }
}

impl From<Item> for String {
    fn from(item: Item) -> Self {
        match item {
            Item::Text(s) | Item::Image(s) => s,
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_detects_images_by_extension() {
        assert_eq!(Item::parse("img/img1.png"), Item::image("img/img1.png"));
        assert_eq!(Item::parse("photos/CAT.JPG"), Item::image("photos/CAT.JPG"));
        assert_eq!(Item::parse("banana"), Item::text("banana"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let items = vec![Item::text("dog"), Item::image("img/img2.png")];
        let json = serde_json::to_string(&items).unwrap();
        assert_eq!(json, r#"["dog","img/img2.png"]"#);

        let back: Vec<Item> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, items);
    }

    #[test]
    fn image_button_wraps_img_tag() {
        let html = Item::image("img/img3.png").button_html();
        assert!(html.contains(r#"<img src="img/img3.png" width="150">"#));
        assert!(html.starts_with(r#"<button class="jspsych-btn""#));
    }
}

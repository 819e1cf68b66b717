use serde::{Deserialize, Serialize};

/// One extracted listing entry. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub title: String,
    pub post_url: Option<String>,
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Records found on one listing page plus the raw `href` of its next-page link.
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    pub records: Vec<PostRecord>,
    pub next_page_url: Option<String>,
}

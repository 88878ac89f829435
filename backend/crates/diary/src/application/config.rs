//! Application Configuration

pub const DEFAULT_PAGE_SIZE: u64 = 5;

#[derive(Debug, Clone)]
pub struct DiaryConfig {
    /// Diaries per listing page
    pub page_size: u64,
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DiaryConfig {
    pub fn development() -> Self {
        Self::default()
    }
}

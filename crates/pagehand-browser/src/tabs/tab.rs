use crate::driver::PageDriver;

/// One open page. Its index is its position in the manager's list.
pub struct Tab {
    pub page: Box<dyn PageDriver>,
    pub purpose: Option<String>,
}

impl Tab {
    pub fn new(page: Box<dyn PageDriver>, purpose: Option<String>) -> Self {
        Self { page, purpose }
    }
}

impl std::fmt::Debug for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tab")
            .field("page", &self.page.page_id())
            .field("purpose", &self.purpose)
            .finish()
    }
}

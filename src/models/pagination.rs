/// Paged envelope returned by the storefront list endpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub active: bool,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: vec![],
            current_page: 1,
            last_page: 1,
            per_page: 0,
            total: 0,
        }
    }
}

impl<T> Page<T> {
    /// Links to every page, the current one marked active
    pub fn links(&self) -> Vec<PageLink> {
        (1..=self.last_page.max(1))
            .map(|number| PageLink {
                number,
                active: number == self.current_page,
            })
            .collect()
    }

    /// Clamps a requested page number into `1..=last_page`
    pub fn clamp(&self, page: u32) -> u32 {
        page.max(1).min(self.last_page.max(1))
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

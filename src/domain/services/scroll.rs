#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;

use ratatui::widgets::ScrollbarState;

const PAGE_LENGTH: u16 = 10;

#[derive(Default)]
pub struct Scroll {
    list_length: u16,
    viewport_length: u16,
    pub position: u16,
    pub scrollbar_state: ScrollbarState,
}

impl Scroll {
    fn max_position(&self) -> u16 {
        return self.list_length.saturating_sub(self.viewport_length);
    }

    pub fn is_at_end(&self) -> bool {
        return self.position >= self.max_position();
    }

    pub fn up(&mut self) {
        self.position = self.position.saturating_sub(1);
        self.sync_scrollbar();
    }

    pub fn up_page(&mut self) {
        self.position = self.position.saturating_sub(PAGE_LENGTH);
        self.sync_scrollbar();
    }

    pub fn down(&mut self) {
        self.position = self.position.saturating_add(1).min(self.max_position());
        self.sync_scrollbar();
    }

    pub fn down_page(&mut self) {
        self.position = self
            .position
            .saturating_add(PAGE_LENGTH)
            .min(self.max_position());
        self.sync_scrollbar();
    }

    pub fn last(&mut self) {
        self.position = self.max_position();
        self.sync_scrollbar();
    }

    /// Resizes the scroll area. A view that was following the end of the
    /// conversation keeps following it as answers stream in.
    pub fn set_state(&mut self, list_length: u16, viewport_length: u16) {
        let following = self.is_at_end();
        self.list_length = list_length;
        self.viewport_length = viewport_length;

        if following {
            self.position = self.max_position();
        } else {
            self.position = self.position.min(self.max_position());
        }
        self.sync_scrollbar();
    }

    fn sync_scrollbar(&mut self) {
        self.scrollbar_state = self
            .scrollbar_state
            .content_length(self.list_length)
            .viewport_content_length(self.viewport_length)
            .position(self.position);
    }
}

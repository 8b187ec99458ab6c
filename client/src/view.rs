/// Presentation side of a list. The controller hands it typed rows, never
/// markup, and calls it while holding its state lock so updates arrive in
/// the order they were applied.
pub trait ListView<T>: Send {
    /// The list was reloaded from scratch; `items` is its whole content.
    fn replace(&mut self, items: &[T]);

    /// `items` were added to the end of the list.
    fn append(&mut self, items: &[T]);

    /// Whether a "load more" action is currently offered.
    fn set_load_more(&mut self, armed: bool);
}

/// Headless lists: the controller's own snapshot is the only output.
impl<T> ListView<T> for () {
    fn replace(&mut self, _items: &[T]) {}

    fn append(&mut self, _items: &[T]) {}

    fn set_load_more(&mut self, _armed: bool) {}
}

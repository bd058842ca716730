//! Row source contract

/// Pull-based supplier of worksheet rows.
///
/// One operation: produce the next row's cell texts in column order, or
/// `None` once the source is exhausted. Backing storage is up to the
/// implementor - an in-memory list, a database cursor, a file scan.
/// Row numbers are assigned by the writer, not the source.
pub trait RowSource {
    fn next_row(&mut self) -> Option<Vec<String>>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn next_row(&mut self) -> Option<Vec<String>> {
        (**self).next_row()
    }
}

/// Adapter turning any iterator of rows into a [`RowSource`].
///
/// # Examples
///
/// ```
/// use sheetstream::{IterSource, RowSource};
///
/// let rows = vec![
///     vec!["a".to_string(), "b".to_string()],
///     vec!["c".to_string()],
/// ];
/// let mut source = IterSource::new(rows.into_iter());
/// assert_eq!(source.next_row().unwrap().len(), 2);
/// ```
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Vec<String>>,
{
    pub fn new(inner: I) -> Self {
        IterSource { inner }
    }
}

impl<I> RowSource for IterSource<I>
where
    I: Iterator<Item = Vec<String>>,
{
    fn next_row(&mut self) -> Option<Vec<String>> {
        self.inner.next()
    }
}

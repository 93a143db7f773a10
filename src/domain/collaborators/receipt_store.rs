/// Read-only access to the locally stored receipt blob.
pub trait ReceiptStore: Send + Sync + 'static {
    /// Returns the opaque receipt bytes, or `None` if no receipt is stored.
    fn receipt_data(&self) -> Option<Vec<u8>>;
}

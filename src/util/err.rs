/// Converts errors from their error type (of the submodule) to that of
/// a leash::Error variant.
pub mod err_macro {
    macro_rules! impl_err {
        ($from:ty, $variant:ident) => {
            impl From<$from> for $crate::Error {
                fn from(value: $from) -> Self {
                    $crate::Error::$variant(value)
                }
            }
        };
    }

    pub(crate) use impl_err;
}

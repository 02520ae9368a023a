/// Build a [`DynArray`](crate::DynArray) from a list of elements.
///
/// - `dyn_array![]` creates an empty array.
/// - `dyn_array![a, b, c]` creates an array with exactly those elements.
/// - `dyn_array![elem; n]` creates `n` clones of `elem`.
///
/// ```rust
/// use vessel::dyn_array;
///
/// let a = dyn_array![1, 2, 3];
/// assert_eq!(a.capacity(), 3);
///
/// let b = dyn_array![0u8; 4];
/// assert_eq!(b, [0, 0, 0, 0]);
/// ```
#[macro_export]
macro_rules! dyn_array {
    () => {
        $crate::DynArray::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::DynArray::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::DynArray::from([$($x),+])
    };
}

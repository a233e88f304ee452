// Setter Columns
//
// `Func` wraps a setter closure `(target, value)`. Each column created from it
// owns a typed `Slot` for the value, so the closure itself is shared and
// never holds row state.

use std::sync::Arc;

use crate::column::{mutation_error, Column, Scanner};
use crate::common::{BoxError, Destination, FromValue, ScanResult, Slot};

type Setter<T, V> = dyn Fn(&mut T, V) -> ScanResult<()> + Send + Sync;

/// A column scanner built from a fallible setter over values of type `V`
pub struct Func<T, V> {
    setter: Arc<Setter<T, V>>,
}

impl<T, V> Clone for Func<T, V> {
    fn clone(&self) -> Self {
        Func { setter: Arc::clone(&self.setter) }
    }
}

impl<T, V> Func<T, V> {
    /// Create a scanner from a setter returning `ScanResult`
    pub fn new<F>(setter: F) -> Self
    where
        F: Fn(&mut T, V) -> ScanResult<()> + Send + Sync + 'static,
    {
        Func { setter: Arc::new(setter) }
    }
}

struct FuncColumn<'f, T, V> {
    slot: Slot<V>,
    setter: &'f Setter<T, V>,
}

impl<'f, T, V> Column<T> for FuncColumn<'f, T, V>
where
    V: FromValue + Default,
{
    fn scan_slot(&mut self) -> &mut dyn Destination {
        &mut self.slot
    }

    fn apply(&mut self, target: &mut T) -> ScanResult<()> {
        (self.setter)(target, self.slot.take())
    }
}

impl<T, V> Scanner<T> for Func<T, V>
where
    T: 'static,
    V: FromValue + Default + 'static,
{
    fn column(&self) -> Box<dyn Column<T> + '_> {
        Box::new(FuncColumn {
            slot: Slot::new(),
            setter: &*self.setter,
        })
    }
}

/// Column that passes the scanned value to `set` as-is
pub fn any<T, V, F>(set: F) -> Func<T, V>
where
    F: Fn(&mut T, V) + Send + Sync + 'static,
{
    Func::new(move |target, value| {
        set(target, value);
        Ok(())
    })
}

/// Like `any`, with a setter that can reject the value
pub fn any_err<T, V, F, E>(set: F) -> Func<T, V>
where
    F: Fn(&mut T, V) -> Result<(), E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Func::new(move |target, value| set(target, value).map_err(mutation_error))
}

/// Nullable column: `set` receives the scanned value, or `default` for NULL
pub fn null<T, V, F>(default: V, set: F) -> Func<T, Option<V>>
where
    V: Clone + Send + Sync + 'static,
    F: Fn(&mut T, V) + Send + Sync + 'static,
{
    Func::new(move |target, value: Option<V>| {
        set(target, value.unwrap_or_else(|| default.clone()));
        Ok(())
    })
}

/// Like `null`, with a setter that can reject the value
pub fn null_err<T, V, F, E>(default: V, set: F) -> Func<T, Option<V>>
where
    V: Clone + Send + Sync + 'static,
    F: Fn(&mut T, V) -> Result<(), E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Func::new(move |target, value: Option<V>| {
        set(target, value.unwrap_or_else(|| default.clone())).map_err(mutation_error)
    })
}

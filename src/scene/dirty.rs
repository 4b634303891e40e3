use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Tracks mutable access to a value using a dirty flag.
///
/// The dirty flag is asserted whenever this type's `DerefMut` impl is
/// invoked and can be reset to `false` via the `Dirty::clean` method.
///
/// Values are initially dirty when created, cloned or deserialized.
#[derive(Copy, Debug, Default)]
pub struct Dirty<T> {
    is_clean: bool,
    inner: T,
}

impl<T> Dirty<T> {
    /// Creates a new dirty value.
    pub fn new(inner: T) -> Self {
        Self {
            is_clean: false,
            inner,
        }
    }

    /// Forcibly dirties the value.
    pub fn dirty(this: &mut Self) {
        this.is_clean = false;
    }

    pub fn is_dirty(this: &Self) -> bool {
        !this.is_clean
    }

    /// Marks the value as clean and returns whether it was dirty.
    ///
    /// The `update` callback is invoked if the value is dirty. If the callback
    /// fails by returning an error, the value will remain dirty and unchanged.
    pub fn clean<E>(
        this: &mut Self,
        update: impl FnOnce(&T) -> Result<(), E>,
    ) -> Result<bool, E> {
        if this.is_clean {
            return Ok(false);
        }

        update(&this.inner)?;
        this.is_clean = true;

        Ok(true)
    }
}

impl<T: Clone> Clone for Dirty<T> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<T> std::ops::Deref for Dirty<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> std::ops::DerefMut for Dirty<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.is_clean = false;

        &mut self.inner
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Dirty<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::new(T::deserialize(deserializer)?))
    }
}

impl<T: PartialEq> PartialEq for Dirty<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq(&other.inner)
    }
}

impl<T: Serialize> Serialize for Dirty<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_values_are_dirty() {
        let value = Dirty::new(5);

        assert!(Dirty::is_dirty(&value));
    }

    #[test]
    fn clean_runs_update_once() {
        let mut value = Dirty::new(5);
        let mut calls = 0;

        let first: Result<bool, ()> = Dirty::clean(&mut value, |_| {
            calls += 1;
            Ok(())
        });

        let second: Result<bool, ()> = Dirty::clean(&mut value, |_| {
            calls += 1;
            Ok(())
        });

        assert_eq!(first, Ok(true));
        assert_eq!(second, Ok(false));
        assert_eq!(calls, 1);
    }

    #[test]
    fn failed_update_keeps_value_dirty() {
        let mut value = Dirty::new(5);

        let result = Dirty::clean(&mut value, |_| Err("boom"));

        assert_eq!(result, Err("boom"));
        assert!(Dirty::is_dirty(&value));
    }

    #[test]
    fn mutable_access_dirties_value() {
        let mut value = Dirty::new(5);

        let _: Result<bool, ()> = Dirty::clean(&mut value, |_| Ok(()));
        assert!(!Dirty::is_dirty(&value));

        *value += 1;

        assert!(Dirty::is_dirty(&value));
        assert_eq!(*value, 6);
    }

    #[test]
    fn deserialized_values_are_dirty() {
        let value: Dirty<u32> = serde_json::from_str("7").unwrap();

        assert!(Dirty::is_dirty(&value));
        assert_eq!(*value, 7);
    }
}

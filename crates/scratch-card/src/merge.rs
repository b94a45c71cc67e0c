//! Structural merge of caller options over defaults.
//!
//! Works on a closed schema: every option record implements [`Merge`] field by
//! field, so there is no generic object walking. Rules:
//! - a value supplied by the caller wins over the default,
//! - nested records merge recursively,
//! - arrays are taken whole from whichever side supplies them.

/// Combine `self` (caller values) with `defaults`.
pub trait Merge: Sized {
    fn merge(self, defaults: Self) -> Self;
}

impl<T: Merge> Merge for Option<T> {
    fn merge(self, defaults: Self) -> Self {
        match (self, defaults) {
            (Some(ours), Some(theirs)) => Some(ours.merge(theirs)),
            (ours, theirs) => ours.or(theirs),
        }
    }
}

/// Leaf values replace the default wholesale.
macro_rules! merge_as_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Merge for $ty {
                fn merge(self, _defaults: Self) -> Self {
                    self
                }
            }
        )*
    };
}

merge_as_leaf!(bool, f64, String);

impl<T> Merge for Vec<T> {
    fn merge(self, _defaults: Self) -> Self {
        self
    }
}

/// Implement [`Merge`] for a record by merging each listed field.
#[macro_export]
macro_rules! merge_fields {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::merge::Merge for $ty {
            fn merge(self, defaults: Self) -> Self {
                Self {
                    $($field: $crate::merge::Merge::merge(self.$field, defaults.$field),)*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Inner {
        a: Option<f64>,
        b: Option<String>,
    }
    merge_fields!(Inner { a, b });

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Outer {
        inner: Option<Inner>,
        list: Option<Vec<u32>>,
        flag: Option<bool>,
    }
    merge_fields!(Outer { inner, list, flag });

    #[test]
    fn caller_value_wins() {
        let merged = Some(2.0_f64).merge(Some(1.0));
        assert_eq!(merged, Some(2.0));
        let merged = None.merge(Some(1.0_f64));
        assert_eq!(merged, Some(1.0));
    }

    #[test]
    fn nested_records_merge_per_field() {
        let caller = Outer {
            inner: Some(Inner { a: Some(5.0), b: None }),
            ..Default::default()
        };
        let defaults = Outer {
            inner: Some(Inner { a: Some(1.0), b: Some("x".into()) }),
            flag: Some(true),
            ..Default::default()
        };
        let merged = caller.merge(defaults);
        assert_eq!(merged.inner, Some(Inner { a: Some(5.0), b: Some("x".into()) }));
        assert_eq!(merged.flag, Some(true));
    }

    #[test]
    fn arrays_are_copied_whole() {
        let caller = Outer { list: Some(vec![9]), ..Default::default() };
        let defaults = Outer { list: Some(vec![1, 2, 3]), ..Default::default() };
        assert_eq!(caller.merge(defaults).list, Some(vec![9]));
    }
}

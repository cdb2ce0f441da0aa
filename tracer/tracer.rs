//! A trivial tracing facility.

use bitmask_enum::bitmask;

/// What to report on standard error while translating.
#[bitmask]
pub enum Trace {
    Scan,
    Parse,
    Reify,
    Emit,
}

impl Trace {
    /// Look up a category by its lower-case name; `all` means every one.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all" => Some(Self::all_bits()),
            "scan" => Some(Self::Scan),
            "parse" => Some(Self::Parse),
            "reify" => Some(Self::Reify),
            "emit" => Some(Self::Emit),
            _ => None,
        }
    }
}

#[macro_export]
macro_rules! trace {
    ($trace:expr, $level:ident, $fmt:literal $(,)? $($arg:expr),* $(,)?) => {
        if $trace.intersects($crate::Trace::$level) {
            eprintln!($fmt, $($arg),*);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(Trace::from_name("scan"), Some(Trace::Scan));
        assert_eq!(Trace::from_name("all"), Some(Trace::all_bits()));
        assert!(Trace::from_name("all").is_some_and(|t| t.contains(Trace::Emit)));
        assert_eq!(Trace::from_name("solve"), None);
        assert!(!Trace::none().intersects(Trace::Reify));
    }
}

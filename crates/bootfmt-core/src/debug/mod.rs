//! Debug-gated printing.
//!
//! The `debug` variable holds a list of condition names separated by
//! whitespace or `, ; | &`. A message tagged with a condition prints when
//! the list contains `all` or the condition itself, and not when it
//! contains the condition prefixed with `-`.
//!
//! ```text
//! debug=all,-disk     everything except "disk"
//! debug=net mm        only "net" and "mm"
//! ```

use crate::config::Environment;
use crate::string::word::words;

/// Name of the variable that selects debug conditions.
pub const DEBUG_VAR: &str = "debug";

/// True if messages tagged `condition` should print.
#[must_use]
pub fn debug_enabled<E: Environment + ?Sized>(env: &E, condition: &str) -> bool {
    let Some(list) = env.get(DEBUG_VAR) else {
        return false;
    };
    let condition = condition.as_bytes();

    let mut enabled = false;
    for word in words(list.as_bytes()) {
        match word {
            b"all" => enabled = true,
            w if w == condition => enabled = true,
            [b'-', rest @ ..] if rest == condition => return false,
            _ => {}
        }
    }
    enabled
}

/// Print through a [`Printer`](crate::stdio::Printer) when `condition` is
/// enabled, prefixed with the call site.
///
/// ```ignore
/// dprintf!(printer, &env, "disk", b"read %u sectors\n", count);
/// ```
#[macro_export]
macro_rules! dprintf {
    ($printer:expr, $env:expr, $condition:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $printer.dprintf(
            $env,
            file!(),
            line!(),
            $condition,
            $fmt,
            &$crate::args!($($arg),*),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapEnv;

    fn enabled(list: &str, condition: &str) -> bool {
        debug_enabled(&MapEnv::new().with(DEBUG_VAR, list), condition)
    }

    #[test]
    fn test_unset_is_disabled() {
        assert!(!debug_enabled(&MapEnv::new(), "disk"));
    }

    #[test]
    fn test_all_and_named() {
        assert!(enabled("all", "disk"));
        assert!(enabled("net,disk", "disk"));
        assert!(enabled("net disk", "disk"));
        assert!(!enabled("net", "disk"));
    }

    #[test]
    fn test_whole_words_only() {
        assert!(!enabled("diskfilter", "disk"));
        assert!(!enabled("xdisk", "disk"));
    }

    #[test]
    fn test_negation_wins() {
        assert!(!enabled("all,-disk", "disk"));
        assert!(!enabled("-disk all", "disk"));
        assert!(!enabled("disk;-disk", "disk"));
        assert!(enabled("all,-disk", "net"));
    }

    #[test]
    fn test_other_separators() {
        assert!(enabled("net|disk", "disk"));
        assert!(enabled("net&disk", "disk"));
        assert!(enabled("\tdisk\n", "disk"));
    }
}

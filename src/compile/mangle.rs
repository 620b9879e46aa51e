//! Unit name mangling
//!
//! Maps systemd unit identifiers onto the daemon's task namespace. The
//! characters systemd allows but the daemon rejects (`.`, `@`, `:`) all
//! collapse to `-`, so identifiers that differ only in separator choice
//! mangle to the same name (`a.b` and `a:b` both become `systemd-a-b`).
//! That collision is deliberate and detected later: the synthesizer checks
//! every mangled name for duplicates before anything is emitted.

/// Mangle a systemd unit identifier into a task name
///
/// Total and deterministic; the result always starts with `systemd-` and
/// satisfies the daemon's identifier rules.
pub fn mangle_unit_name(unit: &str) -> String {
    format!("systemd-{}", unit.replace(['.', '@', ':'], "-"))
}

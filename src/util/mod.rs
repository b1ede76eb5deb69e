// Goes to stderr so it never mixes with rendered output on stdout
#[macro_export]
#[cfg(debug_assertions)]
macro_rules! println_debug {
    ($($x:tt)*) => {{
        eprint!("[debug] ");
        eprintln!($($x)*);
    }}
}

#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! println_debug {
    ($($x:tt)*) => {}
}

#[inline]
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[inline]
pub fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_numeric()
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_part),
        _ => false,
    }
}

/// Previous index in a cyclic list of `len` entries.
pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

/// Next index in a cyclic list of `len` entries.
pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_both_ends() {
        assert_eq!(wrap_decrement(0, 3), 2);
        assert_eq!(wrap_increment(2, 3), 0);
        assert_eq!(wrap_increment(0, 0), 0);
    }
}

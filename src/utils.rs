use core::borrow::Borrow;

pub(crate) fn equivalent_key<K, Q>(k: &Q) -> impl Fn(&K) -> bool + '_
where
    K: Borrow<Q>,
    Q: PartialEq + ?Sized,
{
    move |x| k.eq(x.borrow())
}

/// Drops every occurrence of `key` from the sequence, not just the first, and returns how many
/// entries were dropped.
pub(crate) fn strip_all<K, Q>(seq: &mut Vec<K>, key: &Q) -> usize
where
    K: Borrow<Q>,
    Q: PartialEq + ?Sized,
{
    let before = seq.len();
    seq.retain(|x| !equivalent_key::<K, Q>(key)(x));
    before - seq.len()
}

pub(crate) fn count_of<K, Q>(seq: &[K], key: &Q) -> usize
where
    K: Borrow<Q>,
    Q: PartialEq + ?Sized,
{
    seq.iter().filter(|x| equivalent_key::<K, Q>(key)(*x)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_all_drops_every_match() {
        let mut seq = vec!["a", "b", "a", "c", "a"];
        assert_eq!(strip_all(&mut seq, &"a"), 3);
        assert_eq!(seq, vec!["b", "c"]);
        assert_eq!(strip_all(&mut seq, &"z"), 0);
        assert_eq!(seq, vec!["b", "c"]);
    }

    #[test]
    fn count_of_borrowed_keys() {
        let seq: Vec<String> = vec!["x".into(), "y".into(), "x".into()];
        assert_eq!(count_of(&seq, "x"), 2);
        assert_eq!(count_of(&seq, "y"), 1);
        assert_eq!(count_of(&seq, "q"), 0);
    }
}

/// Capability for choosing the order streams are packed in.
///
/// Callers that want related streams clustered for read locality hand one
/// of these to [`pack`](crate::pack). The writer presents the canonical
/// relative paths in enumeration order; returning `Some` replaces the pack
/// order, returning `None` keeps it.
///
/// The returned list must be a permutation of the input (same paths, same
/// multiplicities). The writer does not check this; an ordering that drops,
/// invents, or duplicates paths produces an undefined container.
pub trait StreamOrdering {
    fn reorder(&self, paths: &[String]) -> Option<Vec<String>>;
}

/// Any plain function of the right shape can serve as the capability.
impl<F> StreamOrdering for F
where
    F: Fn(&[String]) -> Option<Vec<String>>,
{
    fn reorder(&self, paths: &[String]) -> Option<Vec<String>> {
        self(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_orderings() {
        let reverse = |paths: &[String]| -> Option<Vec<String>> {
            let mut reversed = paths.to_vec();
            reversed.reverse();
            Some(reversed)
        };

        let paths = vec!["/a".to_string(), "/b".to_string()];
        let ordering: &dyn StreamOrdering = &reverse;
        assert_eq!(
            ordering.reorder(&paths),
            Some(vec!["/b".to_string(), "/a".to_string()])
        );
    }

    #[test]
    fn none_means_keep_enumeration_order() {
        let keep = |_: &[String]| -> Option<Vec<String>> { None };
        let ordering: &dyn StreamOrdering = &keep;
        assert_eq!(ordering.reorder(&["/a".to_string()]), None);
    }
}

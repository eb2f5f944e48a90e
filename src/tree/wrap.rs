use crate::attr::Attr;

/// Wrap `attr` in one single-member group per name in `groups`.
///
/// The first name becomes the outermost group. An empty `groups` returns
/// `attr` unchanged.
pub fn build_groups_around_attr(groups: &[String], attr: Attr) -> Attr {
    let Some((innermost, outer)) = groups.split_last() else {
        return attr;
    };

    // Build from the innermost group outward.
    let mut out = Attr::group(innermost.clone(), [attr]);
    for group in outer.iter().rev() {
        out = Attr::group(group.clone(), [out]);
    }
    out
}

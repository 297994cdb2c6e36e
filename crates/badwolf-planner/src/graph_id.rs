/// Strips the `?` a graph binding only wears inside BQL source text, giving
/// the identifier a `Store` actually knows (§6.2).
pub(crate) fn graph_id(binding: &str) -> &str {
    binding.strip_prefix('?').unwrap_or(binding)
}

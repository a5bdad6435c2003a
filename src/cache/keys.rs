//! Cache key derivation.

use url::form_urlencoded;

use crate::application::query::QueryParams;

/// Build the cache key for `view` and the normalized request parameters.
///
/// Pairs are encoded in name order as `application/x-www-form-urlencoded`, so
/// the same parameter set always produces the same key regardless of the order
/// it arrived in. An empty set yields `"{view}:"`.
pub fn list_cache_key(view: &str, params: &QueryParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params.iter() {
        serializer.append_pair(name, value);
    }
    format!("{view}:{}", serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn key_ignores_parameter_order() {
        let a = list_cache_key("MetadataView", &params(&[("sector", "x"), ("sub_sector", "y")]));
        let b = list_cache_key("MetadataView", &params(&[("sub_sector", "y"), ("sector", "x")]));
        assert_eq!(a, b);
        assert_eq!(a, "MetadataView:sector=x&sub_sector=y");
    }

    #[test]
    fn key_is_stable_for_parsed_queries() {
        let a = list_cache_key("ReportsView", &QueryParams::parse(Some("b=2&a=1")));
        let b = list_cache_key("ReportsView", &QueryParams::parse(Some("a=1&b=2")));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_params_end_with_separator() {
        assert_eq!(list_cache_key("InstitutionsView", &QueryParams::new()), "InstitutionsView:");
    }

    #[test]
    fn values_are_form_encoded() {
        let key = list_cache_key("InstitutionsView", &params(&[("name", "J&P Morgan")]));
        assert_eq!(key, "InstitutionsView:name=J%26P+Morgan");
    }

    #[test]
    fn different_inputs_produce_different_keys() {
        let base = list_cache_key("MetadataView", &params(&[("sector", "x")]));
        let other_value = list_cache_key("MetadataView", &params(&[("sector", "y")]));
        let other_name = list_cache_key("MetadataView", &params(&[("sub_sector", "x")]));
        let extra = list_cache_key("MetadataView", &params(&[("sector", "x"), ("page", "1")]));
        let other_view = list_cache_key("ReportsView", &params(&[("sector", "x")]));
        let empty_value = list_cache_key("MetadataView", &params(&[("sector", "")]));
        let keys = [base, other_value, other_name, extra, other_view, empty_value];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}

use serde::{Deserialize, Deserializer};

/// Hosts that serve the site's own uploaded images.
pub const IMAGE_HOSTS: [&str; 2] = ["preview.redd.it", "i.redd.it"];

/// Media URLs come back with `&` escaped as `&amp;`. Other entities are
/// left alone.
pub fn decode_entities(input: &str) -> String {
    input.replace("&amp;", "&")
}

pub fn is_image_host_url(url: &str) -> bool {
    IMAGE_HOSTS.iter().any(|host| url.contains(host))
}

/// Treats an explicit `null` the same as a missing field.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tracing_test::traced_test]
    #[test]
    fn test_decode_entities() {
        assert_eq!(
            decode_entities("https://preview.redd.it/a.jpg?width=640&amp;s=abc"),
            "https://preview.redd.it/a.jpg?width=640&s=abc"
        );
        assert_eq!(decode_entities("plain"), "plain");
        assert_eq!(decode_entities("?a=1&lt;b&amp;c=2"), "?a=1&lt;b&c=2");
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_is_image_host_url() {
        assert!(is_image_host_url("https://i.redd.it/xyz.png"));
        assert!(is_image_host_url("https://preview.redd.it/xyz.png?s=1"));
        assert!(!is_image_host_url("https://v.redd.it/xyz"));
        assert!(!is_image_host_url("https://imgur.com/xyz.png"));
    }
}

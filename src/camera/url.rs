/// Join a base location and a subpath with exactly one `/` between them.
pub fn join(base: &str, subpath: &str) -> String {
    let subpath = subpath.trim_start_matches('/');
    if subpath.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), subpath)
}

/// URL composition capability injected into the camera client.
pub trait UrlJoiner: Send + Sync {
    fn join(&self, base: &str, subpath: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SlashJoiner;

impl UrlJoiner for SlashJoiner {
    fn join(&self, base: &str, subpath: &str) -> String {
        join(base, subpath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_slash() {
        assert_eq!(
            join("http://pi.local/camerapi", "start_recording"),
            "http://pi.local/camerapi/start_recording"
        );
        assert_eq!(
            join("http://pi.local/camerapi/", "start_recording"),
            "http://pi.local/camerapi/start_recording"
        );
        assert_eq!(
            join("http://pi.local/camerapi//", "/stop_recording"),
            "http://pi.local/camerapi/stop_recording"
        );
    }

    #[test]
    fn empty_subpath_keeps_base() {
        assert_eq!(join("http://pi.local/camerapi/", ""), "http://pi.local/camerapi/");
        assert_eq!(join("http://pi.local", "/"), "http://pi.local");
    }

    #[test]
    fn slash_joiner_delegates() {
        assert_eq!(SlashJoiner.join("http://a", "b"), join("http://a", "b"));
    }
}

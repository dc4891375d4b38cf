use crate::config::DomainConfig;

/// Extract the lowercased domain suffix of an email address: the substring
/// after the last `@`. Returns `None` when there is no `@` or the domain
/// part is empty.
pub fn split_domain(email: &str) -> Option<String> {
    let (_, domain) = email.rsplit_once('@')?;
    if domain.is_empty() {
        return None;
    }
    Some(domain.to_lowercase())
}

pub struct Classifier<'a> {
    config: &'a DomainConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a DomainConfig) -> Self {
        Self { config }
    }

    /// Find the owning country for a lowercased domain. Countries are scanned
    /// in config declaration order and the first whose domain list contains
    /// the domain (case-insensitively) wins.
    pub fn country_for(&self, domain: &str) -> Option<&'a str> {
        self.config
            .iter()
            .find(|(_, country)| {
                country
                    .domains
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(domain))
            })
            .map(|(code, _)| code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> DomainConfig {
        DomainConfig::embedded_default().unwrap()
    }

    #[test]
    fn split_takes_last_at_sign() {
        assert_eq!(split_domain("a@gmail.com"), Some("gmail.com".into()));
        assert_eq!(split_domain("weird@user@qq.com"), Some("qq.com".into()));
        assert_eq!(split_domain("User@GMAIL.COM"), Some("gmail.com".into()));
    }

    #[test]
    fn split_rejects_malformed() {
        assert_eq!(split_domain("no-at-sign"), None);
        assert_eq!(split_domain("dangling@"), None);
        assert_eq!(split_domain(""), None);
    }

    #[test]
    fn lookup_matches_known_domains() {
        let config = default_config();
        let classifier = Classifier::new(&config);

        assert_eq!(classifier.country_for("gmail.com"), Some("us"));
        assert_eq!(classifier.country_for("uol.com.br"), Some("br"));
        assert_eq!(classifier.country_for("unknownhost.xyz"), None);
    }

    #[test]
    fn lookup_is_case_insensitive_against_config() {
        let config: DomainConfig =
            serde_json::from_str(r#"{ "de": { "domains": ["GMX.De"] } }"#).unwrap();
        let classifier = Classifier::new(&config);

        assert_eq!(classifier.country_for("gmx.de"), Some("de"));
    }

    #[test]
    fn first_declared_country_wins() {
        // mail.com is listed under both us and uk in the default table
        let config = default_config();
        let classifier = Classifier::new(&config);
        assert_eq!(classifier.country_for("mail.com"), Some("us"));

        // reversing the declaration order flips the winner
        let reversed: DomainConfig = serde_json::from_str(
            r#"{ "uk": { "domains": ["mail.com"] }, "us": { "domains": ["mail.com"] } }"#,
        )
        .unwrap();
        let classifier = Classifier::new(&reversed);
        assert_eq!(classifier.country_for("mail.com"), Some("uk"));
    }
}

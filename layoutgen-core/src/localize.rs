use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use unic_langid::LanguageIdentifier;

const EN_GB: &str = include_str!("../i18n/en-GB.ftl");

/// Fluent-based localizer over the built-in `.ftl` catalogue.
pub struct FluentLoc {
    bundle: FluentBundle<FluentResource>,
}

impl FluentLoc {
    /// Create a localizer using built-in `.ftl` strings (see ../i18n).
    /// Unknown languages fall back to en-GB.
    pub fn builtin(lang: &str) -> Self {
        let fallback: LanguageIdentifier = "en-GB".parse().expect("valid fallback langid");
        let langid: LanguageIdentifier = lang.parse().unwrap_or_else(|_| fallback.clone());

        // en-GB is the only catalogue shipped so far.
        let res = FluentResource::try_new(EN_GB.to_owned()).expect("invalid FTL resource (en-GB.ftl)");

        let mut bundle = FluentBundle::new(vec![langid, fallback]);
        // Plain terminal output; no bidi isolation marks around arguments.
        bundle.set_use_isolating(false);
        bundle.add_resource(res).expect("failed to add FTL resource");
        Self { bundle }
    }

    /// Format a message by code with named args (("name","value"), ...).
    /// Returns the code itself if not found.
    pub fn msg(&self, code: &str, args: &[(&str, &str)]) -> String {
        let Some(msg) = self.bundle.get_message(code) else {
            return code.to_string();
        };
        let Some(pattern) = msg.value() else {
            return code.to_string();
        };

        let mut fa = FluentArgs::new();
        for (k, v) in args {
            fa.set(*k, FluentValue::from(*v));
        }

        let mut errs = vec![];
        let s = self.bundle.format_pattern(pattern, Some(&fa), &mut errs).to_string();

        if errs.is_empty() {
            s
        } else {
            code.to_string()
        }
    }
}

//! Process environment as synthetic `env/<NAME>` keys.

use adnauseam_core::Action;

use crate::index::DependencyIndex;

/// Namespace prefix for environment-derived keys.
pub const ENV_PREFIX: &str = "env/";

/// Inject the current process environment once. Returns how many variables
/// were consumed by some template. Non-UTF-8 entries are skipped.
pub fn seed_env(index: &DependencyIndex) -> usize {
    let vars = std::env::vars_os().filter_map(|(name, value)| {
        Some((name.into_string().ok()?, value.into_string().ok()?))
    });
    seed_from(index, vars)
}

/// Inject `vars` as `env/<NAME>` keys through the regular `set` path.
pub fn seed_from(
    index: &DependencyIndex,
    vars: impl IntoIterator<Item = (String, String)>,
) -> usize {
    vars.into_iter()
        .filter(|(name, value)| {
            let key = format!("{ENV_PREFIX}{name}");
            index.collect(&Action::Set, &key, Some(value.as_str()), 0)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use adnauseam_renderer::Context;

    use super::*;

    #[test]
    fn only_referenced_variables_land_in_contexts() {
        let ctx = Rc::new(RefCell::new(Context::new()));
        let mut index = DependencyIndex::new();
        index.register(&vec!["env/HOSTNAME".to_string()], &ctx);

        let consumed = seed_from(
            &index,
            [
                ("HOSTNAME".to_string(), "box-1".to_string()),
                ("PATH".to_string(), "/usr/bin".to_string()),
            ],
        );

        assert_eq!(consumed, 1);
        assert_eq!(ctx.borrow().get("env/HOSTNAME"), Some("box-1"));
        assert!(!ctx.borrow().contains("env/PATH"));
    }

    #[test]
    fn seeds_from_real_process_environment() {
        std::env::set_var("ADNAUSEAM_SEED_ENV_CHECK", "seeded-value");
        let ctx = Rc::new(RefCell::new(Context::new()));
        let mut index = DependencyIndex::new();
        index.register(&vec!["env/ADNAUSEAM_SEED_ENV_CHECK".to_string()], &ctx);

        assert_eq!(seed_env(&index), 1);
        assert_eq!(
            ctx.borrow().get("env/ADNAUSEAM_SEED_ENV_CHECK"),
            Some("seeded-value")
        );
    }
}

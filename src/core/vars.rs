//! Purpose: Typed read/write operations over an injected `Environment`.
//! Exports: `Vars`.
//! Role: Read path (lookup -> decode -> value or fallback) and write path (encode -> store).
//! Invariants: Reads never fail; unparsable input yields the zero value or the caller default.
//! Invariants: Writes fail only when the store rejects the name or value.
//! Invariants: Nothing is cached; every read observes the store's current contents.
use crate::core::codec::{EnvValue, encode_list};
use crate::core::error::Error;
use crate::core::store::{Environment, SystemEnv};

/// Typed access to variables in `E`.
///
/// ```
/// use std::time::Duration;
/// use typenv::{MemEnv, Vars};
///
/// let vars = Vars::new(MemEnv::new());
/// vars.set("TIMEOUT", Duration::from_secs(90)).unwrap();
/// assert_eq!(vars.get::<Duration>("TIMEOUT"), Duration::from_secs(90));
/// assert_eq!(vars.get_or("RETRIES", 3u32), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Vars<E> {
    env: E,
}

impl Vars<SystemEnv> {
    pub fn system() -> Self {
        Self { env: SystemEnv }
    }
}

impl<E: Environment> Vars<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn into_inner(self) -> E {
        self.env
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.env.lookup(name).is_some()
    }

    /// Decoded value of `name`, or `T::zero()` when unset or unparsable.
    pub fn get<T: EnvValue>(&self, name: &str) -> T {
        let raw = self.env.lookup(name).unwrap_or_default();
        let mut value = T::zero();
        decode_logged(name, &raw, &mut value);
        value
    }

    /// Like [`Vars::get`] but falls back to `default`, returned as-is when `name` is unset.
    pub fn get_or<T: EnvValue>(&self, name: &str, default: T) -> T {
        let Some(raw) = self.env.lookup(name) else {
            return default;
        };
        let mut value = default;
        decode_logged(name, &raw, &mut value);
        value
    }

    /// `None` when `name` is unset or does not parse as `T`.
    pub fn lookup<T: EnvValue>(&self, name: &str) -> Option<T> {
        let raw = self.env.lookup(name)?;
        let parsed = T::parse_raw(raw.trim());
        if parsed.is_none() {
            log_rejected::<T>(name);
        }
        parsed
    }

    pub fn set<T: EnvValue>(&self, name: &str, value: T) -> Result<(), Error> {
        self.env.set(name, &value.encode())
    }

    pub fn unset(&self, name: &str) -> Result<(), Error> {
        self.env.unset(name)
    }

    /// Splits on `,` and decodes every segment, keeping empty and invalid ones as zero.
    ///
    /// An unset variable yields an empty `Vec`; a set but empty one yields one zero element.
    pub fn get_slice<T: EnvValue>(&self, name: &str) -> Vec<T> {
        let Some(raw) = self.env.lookup(name) else {
            return Vec::new();
        };
        raw.split(',')
            .map(|segment| {
                let mut value = T::zero();
                decode_logged(name, segment, &mut value);
                value
            })
            .collect()
    }

    /// Splits on `,`, drops blank segments and decodes the rest positionally.
    ///
    /// Segment `i` starts from `default[i]` (zero past the end), so a segment
    /// that does not parse keeps that seed. Returns `default` unchanged when
    /// `name` is unset or every segment is blank. The result has one entry per
    /// non-blank segment regardless of `default.len()`.
    pub fn get_slice_or<T: EnvValue>(&self, name: &str, default: Vec<T>) -> Vec<T> {
        let Some(raw) = self.env.lookup(name) else {
            return default;
        };
        let segments = raw
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        if segments.is_empty() {
            return default;
        }

        let mut seeds = default.into_iter();
        segments
            .into_iter()
            .map(|segment| {
                let mut value = seeds.next().unwrap_or_else(T::zero);
                decode_logged(name, segment, &mut value);
                value
            })
            .collect()
    }

    pub fn set_slice<T: EnvValue>(&self, name: &str, values: &[T]) -> Result<(), Error> {
        self.env.set(name, &encode_list(values))
    }
}

fn decode_logged<T: EnvValue>(name: &str, raw: &str, value: &mut T) {
    if !value.decode_into(raw) && !raw.trim().is_empty() {
        log_rejected::<T>(name);
    }
}

// Raw values may be secrets; only the name and kind are logged.
fn log_rejected<T: EnvValue>(name: &str) {
    let kind = T::KIND;
    tracing::debug!(name, %kind, "environment value did not parse, keeping fallback");
}

#[cfg(test)]
mod tests {
    use super::Vars;
    use crate::core::error::ErrorKind;
    use crate::core::store::{Environment, MemEnv};
    use std::time::Duration;

    fn vars_with(pairs: &[(&str, &str)]) -> Vars<MemEnv> {
        Vars::new(pairs.iter().copied().collect())
    }

    #[test]
    fn get_returns_zero_for_unset_and_invalid() {
        let vars = vars_with(&[("BAD", "forty-two")]);
        assert_eq!(vars.get::<i64>("MISSING"), 0);
        assert_eq!(vars.get::<i64>("BAD"), 0);
        assert_eq!(vars.get::<String>("MISSING"), "");
        assert!(!vars.get::<bool>("MISSING"));
    }

    #[test]
    fn get_or_returns_default_when_unset() {
        let vars = vars_with(&[("EMPTY", ""), ("JUNK", "maybe")]);
        assert_eq!(vars.get_or("MISSING", 7u8), 7);
        assert!(vars.get_or("EMPTY", true));
        assert!(vars.get_or("JUNK", true));
        assert_eq!(vars.get_or("MISSING", "fallback".to_string()), "fallback");
    }

    #[test]
    fn get_or_prefers_a_parsed_value() {
        let vars = vars_with(&[("N", " 42 ")]);
        assert_eq!(vars.get_or("N", 1i32), 42);
    }

    #[test]
    fn lookup_distinguishes_unset_from_invalid() {
        let vars = vars_with(&[("PORT", "8080"), ("HOST", "not-a-port")]);
        assert_eq!(vars.lookup::<u16>("PORT"), Some(8080));
        assert_eq!(vars.lookup::<u16>("HOST"), None);
        assert_eq!(vars.lookup::<u16>("MISSING"), None);
        assert!(vars.is_set("HOST"));
        assert!(!vars.is_set("MISSING"));
    }

    #[test]
    fn set_and_unset_go_through_the_store() {
        let vars = Vars::new(MemEnv::new());
        vars.set("WAIT", Duration::from_millis(1_500)).expect("set");
        assert_eq!(vars.env().lookup("WAIT").as_deref(), Some("1.5s"));
        vars.unset("WAIT").expect("unset");
        assert!(!vars.is_set("WAIT"));

        let err = vars.set("", 1u8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidName);
    }

    #[test]
    fn get_slice_keeps_every_segment() {
        let vars = vars_with(&[("NUMS", "1,,x, 4"), ("EMPTY", "")]);
        assert_eq!(vars.get_slice::<u32>("NUMS"), vec![1, 0, 0, 4]);
        assert_eq!(vars.get_slice::<u32>("EMPTY"), vec![0]);
        assert!(vars.get_slice::<u32>("MISSING").is_empty());
    }

    #[test]
    fn get_slice_or_seeds_positionally() {
        let vars = vars_with(&[("FLAGS", "true,false, on,    of")]);
        assert_eq!(
            vars.get_slice_or("FLAGS", vec![false]),
            vec![true, false, true, false]
        );
        assert_eq!(
            vars.get_slice_or("FLAGS", vec![true, true, true, true, true]),
            vec![true, false, true, true]
        );
    }

    #[test]
    fn get_slice_or_falls_back_when_blank() {
        let vars = vars_with(&[("BLANK", ""), ("COMMAS", ",,"), ("SPACES", " , ")]);
        for name in ["BLANK", "COMMAS", "SPACES", "MISSING"] {
            assert_eq!(vars.get_slice_or(name, vec![true, false]), vec![true, false]);
        }
    }

    #[test]
    fn set_slice_joins_encodings() {
        let vars = Vars::new(MemEnv::new());
        vars.set_slice("PORTS", &[80u16, 443]).expect("set");
        assert_eq!(vars.env().lookup("PORTS").as_deref(), Some("80,443"));
        assert_eq!(vars.get_slice::<u16>("PORTS"), vec![80, 443]);

        vars.set_slice::<u16>("NONE", &[]).expect("set empty");
        assert_eq!(vars.get_slice_or("NONE", vec![1u16]), vec![1]);
    }
}

//! Try-syntax parser
//!
//! Flags follow the shape of the historic try syntax: short flags take an
//! attached or a following value (`-bdo`, `-b do`), long flags take
//! `--flag=value` or a following value. Anything the parser does not
//! understand is skipped with a warning; a typo must never block a push.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use taskgraph_core::config::TrySyntaxConfig;

use super::aliases::{resolve_talos, resolve_unittest, unittest_alias, SuitePattern};
use super::tokenizer::{split_list, split_try_message};
use super::{BuildType, Selection, TaskKinds, TestSpec, TryOptionSyntax};

/// `name-N` chunk suffix
static CHUNK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>.+)-(?P<chunk>\d+)$").expect("Invalid regex"));

/// `name[platform, ...]` platform filter
static PLATFORM_FILTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[^\[]+)\[(?P<platforms>[^\]]*)\]?$").expect("Invalid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Build,
    Platform,
    Unittests,
    Talos,
    Job,
    Rebuild,
    RebuildTalos,
    AllEmails,
    FailureEmails,
    Notify,
    SetEnv,
    Profile,
    Tag,
    NoRetry,
    Interactive,
}

/// Whether a flag takes a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    /// Switch
    None,
    /// Value may be omitted; the constant is used instead
    Optional(&'static str),
    /// Value must be present
    Required,
}

impl Flag {
    fn from_short(name: char) -> Option<Self> {
        let flag = match name {
            'b' => Self::Build,
            'p' => Self::Platform,
            'u' => Self::Unittests,
            't' => Self::Talos,
            'j' => Self::Job,
            'e' => Self::AllEmails,
            'f' => Self::FailureEmails,
            'i' => Self::Interactive,
            _ => return None,
        };
        Some(flag)
    }

    fn from_long(name: &str) -> Option<Self> {
        let flag = match name {
            "build" => Self::Build,
            "platform" => Self::Platform,
            "unittests" => Self::Unittests,
            "talos" => Self::Talos,
            "job" => Self::Job,
            "rebuild" => Self::Rebuild,
            "rebuild-talos" => Self::RebuildTalos,
            "all-emails" => Self::AllEmails,
            "failure-emails" => Self::FailureEmails,
            "notify" => Self::Notify,
            "setenv" => Self::SetEnv,
            "spsProfile" | "geckoProfile" | "profile" => Self::Profile,
            "tag" => Self::Tag,
            "no-retry" => Self::NoRetry,
            "interactive" => Self::Interactive,
            _ => return None,
        };
        Some(flag)
    }

    fn arity(self) -> Arity {
        match self {
            Self::Platform | Self::Unittests | Self::Talos | Self::Job => Arity::Optional("all"),
            Self::Build
            | Self::Rebuild
            | Self::RebuildTalos
            | Self::Notify
            | Self::SetEnv
            | Self::Tag => Arity::Required,
            Self::AllEmails
            | Self::FailureEmails
            | Self::Profile
            | Self::NoRetry
            | Self::Interactive => Arity::None,
        }
    }
}

/// Check whether a token looks like a flag rather than a value.
///
/// Negative numbers are values.
fn is_flag_like(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| !c.is_ascii_digit())
}

/// Raw flag values, before interpretation
#[derive(Debug, Default)]
struct RawOptions {
    build: Option<String>,
    platforms: Option<String>,
    unittests: Option<String>,
    talos: Option<String>,
    jobs: Vec<String>,
    rebuild: Option<String>,
    rebuild_talos: Option<String>,
    notifications: Option<String>,
    env: Vec<String>,
    profile: bool,
    tag: Option<String>,
    no_retry: bool,
    interactive: bool,
}

impl RawOptions {
    fn set(&mut self, flag: Flag, value: Option<String>) {
        match flag {
            Flag::Build => self.build = value,
            Flag::Platform => self.platforms = value,
            Flag::Unittests => self.unittests = value,
            Flag::Talos => self.talos = value,
            Flag::Job => self.jobs.extend(value),
            Flag::Rebuild => self.rebuild = value,
            Flag::RebuildTalos => self.rebuild_talos = value,
            Flag::AllEmails => self.notifications = Some("all".to_string()),
            Flag::FailureEmails => self.notifications = Some("failure".to_string()),
            Flag::Notify => self.notifications = value,
            Flag::SetEnv => self.env.extend(value),
            Flag::Profile => self.profile = true,
            Flag::Tag => self.tag = value,
            Flag::NoRetry => self.no_retry = true,
            Flag::Interactive => self.interactive = true,
        }
    }
}

/// Parser turning push messages into [`TryOptionSyntax`] requests
#[derive(Debug, Clone)]
pub struct TrySyntaxParser {
    marker: String,
    kinds: TaskKinds,
    ridealong_builds: BTreeMap<String, Vec<String>>,
    test_platform_aliases: BTreeMap<String, Vec<String>>,
}

impl TrySyntaxParser {
    /// Create a parser with default configuration
    pub fn new() -> Self {
        Self::with_config(&TrySyntaxConfig::default())
    }

    /// Create a parser with custom configuration
    pub fn with_config(config: &TrySyntaxConfig) -> Self {
        Self {
            marker: config.marker.clone(),
            kinds: TaskKinds::from(config),
            ridealong_builds: config.ridealong_builds.clone(),
            test_platform_aliases: config.test_platform_aliases.clone(),
        }
    }

    /// Parse a push message.
    ///
    /// Never fails: a message without the marker yields a request that
    /// matches nothing, and malformed flags are skipped.
    pub fn parse(&self, message: &str) -> TryOptionSyntax {
        let Some(tokens) = split_try_message(message, &self.marker) else {
            debug!(marker = %self.marker, "no try marker in message, selecting nothing");
            return TryOptionSyntax::empty(self.kinds.clone());
        };

        let raw = self.collect_flags(&tokens);

        let options = TryOptionSyntax {
            build_types: parse_build_types(raw.build.as_deref()),
            platforms: self.parse_platforms(raw.platforms.as_deref().unwrap_or("all")),
            unittests: self
                .parse_tests(raw.unittests.as_deref().unwrap_or("all"), resolve_unittest),
            talos: self.parse_tests(raw.talos.as_deref().unwrap_or("none"), resolve_talos),
            jobs: parse_repeated_names(&raw.jobs, "all"),
            trigger_tests: parse_count("--rebuild", raw.rebuild.as_deref()),
            talos_trigger_tests: parse_count("--rebuild-talos", raw.rebuild_talos.as_deref()),
            notifications: raw.notifications,
            env: raw.env,
            profile: raw.profile,
            tag: raw.tag,
            no_retry: raw.no_retry,
            interactive: raw.interactive,
            kinds: self.kinds.clone(),
        };

        debug!(
            build_types = ?options.build_types,
            platforms = ?options.platforms.items(),
            trigger_tests = options.trigger_tests,
            "parsed try syntax"
        );
        options
    }

    /// Walk the tokens, assigning values to flags
    fn collect_flags(&self, tokens: &[String]) -> RawOptions {
        let mut raw = RawOptions::default();
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];
            i += 1;

            if !is_flag_like(token) {
                warn!(token = %token, "ignoring unexpected try syntax value");
                continue;
            }

            let (flag, inline) = if let Some(long) = token.strip_prefix("--") {
                let (name, inline) = match long.split_once('=') {
                    Some((name, value)) => (name, Some(value.to_string())),
                    None => (long, None),
                };
                (Flag::from_long(name), inline)
            } else {
                let mut chars = token[1..].chars();
                let flag = chars.next().and_then(Flag::from_short);
                let rest: String = chars.collect();
                (flag, (!rest.is_empty()).then_some(rest))
            };

            let Some(flag) = flag else {
                warn!(flag = %token, "ignoring unknown try syntax flag");
                continue;
            };

            let value = match flag.arity() {
                Arity::None => {
                    if inline.is_some() {
                        warn!(flag = %token, "try syntax flag takes no value, ignoring it");
                    }
                    None
                }
                Arity::Optional(constant) => Some(
                    inline
                        .or_else(|| take_value(tokens, &mut i))
                        .unwrap_or_else(|| constant.to_string()),
                ),
                Arity::Required => {
                    let value = inline.or_else(|| take_value(tokens, &mut i));
                    if value.is_none() {
                        warn!(flag = %token, "try syntax flag is missing its value");
                        continue;
                    }
                    value
                }
            };

            raw.set(flag, value);
        }

        raw
    }

    fn parse_platforms(&self, value: &str) -> Selection<String> {
        let Selection::Only(requested) = parse_names(value) else {
            return Selection::All;
        };

        let mut platforms = Vec::new();
        for platform in requested {
            let ridealong = self.ridealong_builds.get(&platform).cloned();
            push_unique(&mut platforms, platform);
            for extra in ridealong.into_iter().flatten() {
                push_unique(&mut platforms, extra);
            }
        }
        Selection::Only(platforms)
    }

    /// Parse a suite list such as `mochitest-1,mochitest-3,reftest[linux64]`
    fn parse_tests(&self, value: &str, resolve: fn(&str) -> SuitePattern) -> Selection<TestSpec> {
        let Selection::Only(entries) = parse_names(value) else {
            return Selection::All;
        };

        let mut specs: Vec<TestSpec> = Vec::new();
        for entry in entries {
            let Some(spec) = self.parse_test_entry(&entry, resolve) else {
                warn!(entry = %entry, "ignoring malformed try syntax suite");
                continue;
            };

            // chunks of the same suite on the same platforms accumulate
            if let Some(chunks) = &spec.only_chunks {
                let existing = specs.iter_mut().find(|s| {
                    s.name == spec.name && s.platforms == spec.platforms && s.only_chunks.is_some()
                });
                if let Some(existing) = existing {
                    if let Some(existing_chunks) = existing.only_chunks.as_mut() {
                        existing_chunks.extend(chunks.iter().copied());
                    }
                    existing.literals.extend(spec.literals.iter().cloned());
                    continue;
                }
            }
            specs.push(spec);
        }

        Selection::Only(specs)
    }

    fn parse_test_entry(&self, entry: &str, resolve: fn(&str) -> SuitePattern) -> Option<TestSpec> {
        let (name, platforms) = match PLATFORM_FILTER_REGEX.captures(entry) {
            Some(caps) => {
                let name = caps.name("name")?.as_str().trim();
                let platforms = caps
                    .name("platforms")
                    .map(|m| self.resolve_test_platforms(m.as_str()))
                    .unwrap_or_default();
                (name, Some(platforms))
            }
            None if entry.contains('[') || entry.contains(']') => return None,
            None => (entry, None),
        };

        if name.is_empty() {
            return None;
        }

        // `name-N` restricts to chunk N, unless `name-N` is itself an alias
        let chunked = CHUNK_REGEX
            .captures(name)
            .filter(|_| unittest_alias(name).is_none())
            .and_then(|caps| {
                let base = caps.name("name")?.as_str();
                let chunk: i64 = caps.name("chunk")?.as_str().parse().ok()?;
                Some((base, chunk))
            });

        let spec = match chunked {
            Some((base, chunk)) => TestSpec {
                name: base.to_string(),
                pattern: resolve(base),
                literals: vec![name.to_string()],
                platforms,
                only_chunks: Some([chunk].into_iter().collect()),
            },
            None => TestSpec {
                platforms,
                ..TestSpec::new(name, resolve(name))
            },
        };
        Some(spec)
    }

    /// Expand display names such as `Windows 7` into test platforms.
    ///
    /// Names missing from the table are kept as written.
    fn resolve_test_platforms(&self, value: &str) -> Vec<String> {
        let mut platforms = Vec::new();
        for name in split_list(value) {
            match self.test_platform_aliases.get(&name) {
                Some(resolved) => {
                    for platform in resolved {
                        push_unique(&mut platforms, platform.clone());
                    }
                }
                None => push_unique(&mut platforms, name),
            }
        }
        platforms
    }
}

impl Default for TrySyntaxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Take the next token as a value if it is not a flag
fn take_value(tokens: &[String], i: &mut usize) -> Option<String> {
    let next = tokens.get(*i).filter(|t| !is_flag_like(t))?;
    *i += 1;
    Some(next.clone())
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// `d` selects debug and `o` selects opt, in any combination
fn parse_build_types(value: Option<&str>) -> Vec<BuildType> {
    let mut build_types = Vec::new();
    for c in value.unwrap_or("").chars() {
        let build_type = match c {
            'd' => BuildType::Debug,
            'o' => BuildType::Opt,
            other => {
                warn!(build_type = %other, "ignoring unknown try syntax build type");
                continue;
            }
        };
        if !build_types.contains(&build_type) {
            build_types.push(build_type);
        }
    }
    build_types.sort();
    build_types
}

/// `all` is the wildcard, `none` selects nothing, otherwise a comma list
fn parse_names(value: &str) -> Selection<String> {
    match value {
        "all" => Selection::All,
        "none" => Selection::none(),
        _ => {
            let mut names = Vec::new();
            for name in split_list(value) {
                push_unique(&mut names, name);
            }
            Selection::Only(names)
        }
    }
}

/// Merge the values of a repeatable flag; no occurrence falls back to `default`
fn parse_repeated_names(values: &[String], default: &str) -> Selection<String> {
    if values.is_empty() {
        return parse_names(default);
    }

    let mut names = Vec::new();
    for value in values {
        match parse_names(value) {
            Selection::All => return Selection::All,
            Selection::Only(listed) => {
                for name in listed {
                    push_unique(&mut names, name);
                }
            }
        }
    }
    Selection::Only(names)
}

fn parse_count(flag: &str, value: Option<&str>) -> u32 {
    let Some(value) = value else {
        return 0;
    };
    match value.parse() {
        Ok(count) => count,
        Err(e) => {
            warn!(flag, value, error = %e, "ignoring malformed try syntax count");
            0
        }
    }
}

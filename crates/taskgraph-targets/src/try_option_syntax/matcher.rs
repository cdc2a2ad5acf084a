//! Matching parsed try requests against individual tasks
//!
//! Attribute conventions read here:
//!
//! | attribute | used for |
//! |---|---|
//! | `build_type` | `debug` / `opt`, checked against `-b` |
//! | `build_platform` | checked against `-p` and `-j` |
//! | `run_on_projects` | must contain `try` or `all` when `-p all` |
//! | `unittest_try_name` / `talos_try_name` | suite name for `-u` / `-t` |
//! | `test_platform` | checked against `[...]` suite filters |
//! | `test_chunk` | checked against `-N` chunk suffixes |
//! | `job_try_name` | checked against `-j` |
//! | `tags` | checked against `--tag` |

use taskgraph_tasks::Task;

use super::{BuildType, Selection, TestSpec, TryOptionSyntax};

const BUILD_TYPE: &str = "build_type";
const BUILD_PLATFORM: &str = "build_platform";
const RUN_ON_PROJECTS: &str = "run_on_projects";
const UNITTEST_TRY_NAME: &str = "unittest_try_name";
const TALOS_TRY_NAME: &str = "talos_try_name";
const TEST_PLATFORM: &str = "test_platform";
const TEST_CHUNK: &str = "test_chunk";
const JOB_TRY_NAME: &str = "job_try_name";
const TAGS: &str = "tags";

/// Check whether a parsed request selects a task.
///
/// Looks at nothing but the request and the one task.
pub fn task_matches(options: &TryOptionSyntax, task: &Task) -> bool {
    let Some(kind) = task.kind() else {
        return false;
    };

    if options.kinds.test.contains(kind) {
        match_test(options, task)
    } else if options.kinds.job.contains(kind) {
        match_job(options, task)
    } else if options.kinds.build.contains(kind) {
        build_type_selected(options, task) && platform_selected(options, task)
    } else {
        false
    }
}

/// How many times a selected task should run.
///
/// Unittests run `trigger_tests` times and talos tests
/// `talos_trigger_tests` times; everything else, and any count below one,
/// runs once.
pub fn task_duplicates(options: &TryOptionSyntax, task: &Task) -> u32 {
    let is_test = task.kind().is_some_and(|k| options.kinds.test.contains(k));
    if !is_test {
        return 1;
    }

    let count = if is_talos(task) {
        options.talos_trigger_tests
    } else {
        options.trigger_tests
    };
    count.max(1)
}

fn is_talos(task: &Task) -> bool {
    task.has_attribute(TALOS_TRY_NAME)
}

fn build_type_selected(options: &TryOptionSyntax, task: &Task) -> bool {
    task.attr_str(BUILD_TYPE)
        .and_then(BuildType::parse)
        .is_some_and(|bt| options.build_types.contains(&bt))
}

fn platform_selected(options: &TryOptionSyntax, task: &Task) -> bool {
    match &options.platforms {
        // -p all only picks up tasks that run on try by default
        Selection::All => task
            .attr_list(RUN_ON_PROJECTS)
            .is_some_and(|projects| projects.iter().any(|p| p == "try" || p == "all")),
        Selection::Only(platforms) => task
            .attr_str(BUILD_PLATFORM)
            .is_some_and(|bp| platforms.iter().any(|p| p == bp)),
    }
}

fn match_test(options: &TryOptionSyntax, task: &Task) -> bool {
    if !build_type_selected(options, task) || !platform_selected(options, task) {
        return false;
    }

    if let Some(tag) = &options.tag {
        let tagged = task
            .attr_list(TAGS)
            .is_some_and(|tags| tags.iter().any(|t| t == tag));
        if !tagged {
            return false;
        }
    }

    let (selection, name_attr) = if is_talos(task) {
        (&options.talos, TALOS_TRY_NAME)
    } else {
        (&options.unittests, UNITTEST_TRY_NAME)
    };

    match selection {
        Selection::All => true,
        Selection::Only(specs) => match task.attr_str(name_attr) {
            Some(try_name) => specs.iter().any(|spec| spec_matches(spec, try_name, task)),
            None => false,
        },
    }
}

fn spec_matches(spec: &TestSpec, try_name: &str, task: &Task) -> bool {
    let chunk_ok = match &spec.only_chunks {
        None => true,
        Some(chunks) => task
            .attribute(TEST_CHUNK)
            .and_then(|c| c.as_i64())
            .is_some_and(|c| chunks.contains(&c)),
    };

    let suite_ok =
        (spec.pattern.matches(try_name) && chunk_ok) || spec.literals.iter().any(|l| l == try_name);
    if !suite_ok {
        return false;
    }

    match &spec.platforms {
        None => true,
        Some(platforms) => task
            .attr_str(TEST_PLATFORM)
            .is_some_and(|tp| platforms.iter().any(|p| test_platform_matches(p, tp))),
    }
}

/// `linux64` selects `linux64` as well as `linux64/debug` and `linux64/opt`
fn test_platform_matches(filter: &str, test_platform: &str) -> bool {
    test_platform == filter
        || test_platform
            .strip_prefix(filter)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn match_job(options: &TryOptionSyntax, task: &Task) -> bool {
    match &options.jobs {
        Selection::All => true,
        Selection::Only(jobs) => [BUILD_PLATFORM, JOB_TRY_NAME]
            .iter()
            .filter_map(|attr| task.attr_str(attr))
            .any(|name| jobs.iter().any(|j| j == name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(platform: &str, build_type: &str) -> Task {
        Task::new(format!("build-{}/{}", platform, build_type))
            .with_kind("build")
            .with_attribute(BUILD_PLATFORM, platform)
            .with_attribute(BUILD_TYPE, build_type)
            .with_attribute(RUN_ON_PROJECTS, vec!["all"])
    }

    fn unittest(platform: &str, build_type: &str, suite: &str, chunk: i64) -> Task {
        Task::new(format!("test-{}/{}-{}-{}", platform, build_type, suite, chunk))
            .with_kind("desktop-test")
            .with_attribute(BUILD_PLATFORM, platform)
            .with_attribute(BUILD_TYPE, build_type)
            .with_attribute(TEST_PLATFORM, format!("{}/{}", platform, build_type))
            .with_attribute(UNITTEST_TRY_NAME, suite)
            .with_attribute(TEST_CHUNK, chunk)
            .with_attribute(RUN_ON_PROJECTS, vec!["all"])
    }

    fn talos(platform: &str, suite: &str) -> Task {
        Task::new(format!("test-{}/opt-talos-{}", platform, suite))
            .with_kind("desktop-test")
            .with_attribute(BUILD_PLATFORM, platform)
            .with_attribute(BUILD_TYPE, "opt")
            .with_attribute(TALOS_TRY_NAME, suite)
            .with_attribute(RUN_ON_PROJECTS, vec!["mozilla-central"])
    }

    fn job(platform: &str) -> Task {
        Task::new(format!("source-check-{}", platform))
            .with_kind("source-check")
            .with_attribute(BUILD_PLATFORM, platform)
    }

    #[test]
    fn test_no_marker_matches_nothing() {
        let options = TryOptionSyntax::parse("Bug 1 - no try here");
        assert!(!options.task_matches(&build("linux64", "opt")));
        assert!(!options.task_matches(&unittest("linux64", "opt", "xpcshell", 1)));
        assert!(!options.task_matches(&job("eslint")));
    }

    #[test]
    fn test_build_type_and_platform() {
        let options = TryOptionSyntax::parse("try: -b o -p linux64");
        assert!(options.task_matches(&build("linux64", "opt")));
        assert!(!options.task_matches(&build("linux64", "debug")));
        assert!(!options.task_matches(&build("win32", "opt")));
    }

    #[test]
    fn test_all_platforms_requires_try_projects() {
        let options = TryOptionSyntax::parse("try: -b o -p all");
        assert!(options.task_matches(&build("win32", "opt")));

        let nightly = build("win32", "opt").with_attribute(RUN_ON_PROJECTS, vec!["mozilla-central"]);
        assert!(!options.task_matches(&nightly));

        let on_try = build("win32", "opt").with_attribute(RUN_ON_PROJECTS, vec!["try"]);
        assert!(options.task_matches(&on_try));
    }

    #[test]
    fn test_unknown_or_missing_kind() {
        let options = TryOptionSyntax::parse("try: -b do -p all -u all");
        assert!(!options.task_matches(&Task::new("a")));
        assert!(!options.task_matches(&build("linux64", "opt").with_kind("docker-image")));
    }

    #[test]
    fn test_unittest_suites() {
        let options = TryOptionSyntax::parse("try: -b o -p linux64 -u xpcshell");
        assert!(options.task_matches(&unittest("linux64", "opt", "xpcshell", 1)));
        assert!(!options.task_matches(&unittest("linux64", "opt", "crashtest", 1)));
        assert!(!options.task_matches(&unittest("linux64", "debug", "xpcshell", 1)));
    }

    #[test]
    fn test_unittests_none_and_all() {
        let none = TryOptionSyntax::parse("try: -b o -p linux64 -u none");
        assert!(!none.task_matches(&unittest("linux64", "opt", "xpcshell", 1)));
        assert!(none.task_matches(&build("linux64", "opt")));

        let all = TryOptionSyntax::parse("try: -b o -p linux64 -u all");
        assert!(all.task_matches(&unittest("linux64", "opt", "cramtest", 4)));
    }

    #[test]
    fn test_unittest_alias() {
        let options = TryOptionSyntax::parse("try: -b o -p linux64 -u mochitest-dt");
        assert!(options.task_matches(&unittest("linux64", "opt", "mochitest-devtools-chrome", 2)));
        assert!(!options.task_matches(&unittest("linux64", "opt", "mochitest-plain", 2)));
    }

    #[test]
    fn test_unittest_chunks() {
        let options = TryOptionSyntax::parse("try: -b o -p linux64 -u mochitest-1,mochitest-3");
        assert!(options.task_matches(&unittest("linux64", "opt", "mochitest", 1)));
        assert!(!options.task_matches(&unittest("linux64", "opt", "mochitest", 2)));
        assert!(options.task_matches(&unittest("linux64", "opt", "mochitest", 3)));
    }

    #[test]
    fn test_chunked_name_matches_literal_suite() {
        let options = TryOptionSyntax::parse("try: -b o -p linux64 -u web-platform-tests-2");
        // a suite literally named with a trailing number still matches
        let task = unittest("linux64", "opt", "web-platform-tests-2", 1);
        assert!(options.task_matches(&task));
    }

    #[test]
    fn test_unittest_platform_filter() {
        let options = TryOptionSyntax::parse("try: -b do -p linux64,win32 -u xpcshell[linux64]");
        assert!(options.task_matches(&unittest("linux64", "opt", "xpcshell", 1)));
        assert!(options.task_matches(&unittest("linux64", "debug", "xpcshell", 1)));
        assert!(!options.task_matches(&unittest("win32", "opt", "xpcshell", 1)));
        // builds are not affected by suite filters
        assert!(options.task_matches(&build("win32", "opt")));
    }

    #[test]
    fn test_talos_selection() {
        let options = TryOptionSyntax::parse("try: -b o -p linux64 -u none -t tp5o");
        assert!(options.task_matches(&talos("linux64", "tp5o")));
        assert!(!options.task_matches(&talos("linux64", "svgr")));

        let no_talos = TryOptionSyntax::parse("try: -b o -p linux64 -u all");
        assert!(!no_talos.task_matches(&talos("linux64", "tp5o")));
    }

    #[test]
    fn test_tag_restricts_tests() {
        let options = TryOptionSyntax::parse("try: -b o -p linux64 -u all --tag devtools");
        let tagged = unittest("linux64", "opt", "mochitest", 1).with_attribute(TAGS, vec!["devtools"]);
        let untagged = unittest("linux64", "opt", "mochitest", 2);

        assert!(options.task_matches(&tagged));
        assert!(!options.task_matches(&untagged));
        assert!(options.task_matches(&build("linux64", "opt")));
    }

    #[test]
    fn test_jobs() {
        let all = TryOptionSyntax::parse("try: -b o");
        assert!(all.task_matches(&job("eslint")));

        let some = TryOptionSyntax::parse("try: -j eslint");
        assert!(some.task_matches(&job("eslint")));
        assert!(!some.task_matches(&job("flake8")));

        let by_name = job("lint").with_attribute(JOB_TRY_NAME, "flake8");
        assert!(TryOptionSyntax::parse("try: -j flake8").task_matches(&by_name));

        assert!(!TryOptionSyntax::parse("try: -j none").task_matches(&job("eslint")));
    }

    #[test]
    fn test_task_duplicates() {
        let options = TryOptionSyntax::parse("try: -b o -p linux64 --rebuild 4 --rebuild-talos 2");
        assert_eq!(options.task_duplicates(&unittest("linux64", "opt", "xpcshell", 1)), 4);
        assert_eq!(options.task_duplicates(&talos("linux64", "tp5o")), 2);
        assert_eq!(options.task_duplicates(&build("linux64", "opt")), 1);

        let default = TryOptionSyntax::parse("try: -b o");
        assert_eq!(default.task_duplicates(&unittest("linux64", "opt", "xpcshell", 1)), 1);
    }

    #[test]
    fn test_test_platform_matches() {
        assert!(test_platform_matches("linux64", "linux64"));
        assert!(test_platform_matches("linux64", "linux64/debug"));
        assert!(!test_platform_matches("linux", "linux64/debug"));
    }

    #[test]
    fn test_display_name_platform_filter() {
        let options = TryOptionSyntax::parse("try: -b o -p win32 -u mochitest[Windows 7]");
        let win7 = unittest("win32", "opt", "mochitest", 1).with_attribute(TEST_PLATFORM, "windows7-32/opt");
        let win10 =
            unittest("win32", "opt", "mochitest", 1).with_attribute(TEST_PLATFORM, "windows10-64/opt");

        assert!(options.task_matches(&win7));
        assert!(!options.task_matches(&win10));
    }
}

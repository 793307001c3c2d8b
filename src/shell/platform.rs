//! Platform-specific shell details.

/// Environment variables whose presence marks a CI run.
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// The shell executable and the flag that makes it run a command string.
///
/// `/bin/sh -c` on Unix; `%COMSPEC% /C` on Windows.
pub fn shell_invocation() -> (String, &'static str) {
    if cfg!(target_os = "windows") {
        (
            std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string()),
            "/C",
        )
    } else {
        ("/bin/sh".to_string(), "-c")
    }
}

/// Check if running in a CI environment.
///
/// Used by `main()` to force non-interactive prompts.
pub fn is_ci() -> bool {
    CI_VARS.iter().any(|var| std::env::var(var).is_ok())
}

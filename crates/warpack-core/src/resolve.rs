//! Input archive resolution for build-tool integrations.
//!
//! A build integration hands over the artifacts declared for packaging and
//! needs exactly one launcher archive and one web application archive among
//! them. Explicitly configured paths always take precedence.

use crate::error::ResolveError;
use std::path::Path;
use std::path::PathBuf;

/// Group prefix of launcher artifacts.
pub const LAUNCHER_GROUP_PREFIX: &str = "warpack.launcher";

/// Name prefix of launcher artifacts.
pub const LAUNCHER_NAME_PREFIX: &str = "warpack-es";

/// Artifact kind of web application archives.
pub const WEB_APPLICATION_KIND: &str = "war";

/// A resolved build artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Group or organisation identifier.
    pub group: String,
    /// Artifact name.
    pub name: String,
    /// Packaging kind (`jar`, `war`, ...).
    pub kind: String,
    /// Location of the artifact file.
    pub path: PathBuf,
}

impl Artifact {
    /// Creates an artifact description.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            kind: kind.into(),
            path: path.into(),
        }
    }

    /// `group:name:kind` coordinate used in diagnostics.
    #[must_use]
    pub fn coordinate(&self) -> String {
        format!("{}:{}:{}", self.group, self.name, self.kind)
    }
}

/// Returns `true` for server launcher artifacts.
#[must_use]
pub fn is_launcher_artifact(artifact: &Artifact) -> bool {
    artifact.group.starts_with(LAUNCHER_GROUP_PREFIX)
        && artifact.name.starts_with(LAUNCHER_NAME_PREFIX)
}

/// Returns `true` for web application archives.
#[must_use]
pub fn is_web_application(artifact: &Artifact) -> bool {
    artifact.kind == WEB_APPLICATION_KIND
}

/// Returns the path of the single artifact accepted by `matcher`.
///
/// # Errors
///
/// - `ResolveError::NotFound` if nothing matches
/// - `ResolveError::Ambiguous` if more than one artifact matches
///
/// # Examples
///
/// ```
/// use warpack_core::resolve::Artifact;
/// use warpack_core::resolve::is_web_application;
/// use warpack_core::resolve::resolve_single;
///
/// let artifacts = vec![
///     Artifact::new("warpack.launcher", "warpack-es-jetty", "jar", "/repo/l.jar"),
///     Artifact::new("com.shop", "shop", "war", "/repo/shop.war"),
/// ];
/// let war = resolve_single(&artifacts, is_web_application, "web application").unwrap();
/// assert_eq!(war, std::path::PathBuf::from("/repo/shop.war"));
/// ```
pub fn resolve_single<F>(
    artifacts: &[Artifact],
    matcher: F,
    description: &str,
) -> Result<PathBuf, ResolveError>
where
    F: Fn(&Artifact) -> bool,
{
    let matches: Vec<&Artifact> = artifacts.iter().filter(|a| matcher(a)).collect();

    match matches.as_slice() {
        [] => Err(ResolveError::NotFound {
            description: description.to_string(),
        }),
        [single] => {
            tracing::debug!(artifact = %single.coordinate(), description, "resolved artifact");
            Ok(single.path.clone())
        }
        many => Err(ResolveError::Ambiguous {
            description: description.to_string(),
            candidates: many.iter().map(|a| a.coordinate()).collect(),
        }),
    }
}

/// Returns `explicit` if given, otherwise resolves a single artifact.
///
/// # Errors
///
/// See [`resolve_single`].
pub fn resolve_or<F>(
    explicit: Option<&Path>,
    artifacts: &[Artifact],
    matcher: F,
    description: &str,
) -> Result<PathBuf, ResolveError>
where
    F: Fn(&Artifact) -> bool,
{
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => resolve_single(artifacts, matcher, description),
    }
}

/// Resolves the launcher and application archives of a packaging run.
///
/// # Errors
///
/// See [`resolve_single`].
pub fn resolve_inputs(
    artifacts: &[Artifact],
    launcher: Option<&Path>,
    application: Option<&Path>,
) -> Result<(PathBuf, PathBuf), ResolveError> {
    let launcher = resolve_or(
        launcher,
        artifacts,
        is_launcher_artifact,
        "server launcher archive",
    )?;
    let application = resolve_or(
        application,
        artifacts,
        is_web_application,
        "web application archive",
    )?;
    Ok((launcher, application))
}

//! Creation of a new formula repository.

use crate::banner::BannerFont;
use crate::error::{Error, Result};
use crate::formula::{FormulaData, FormulaGenerator};
use crate::resolver::ReleaseInfo;
use crate::updater::FormulaTarget;
use ghbr_github::{FileChange, GitHub, NewRepository, RepoRef, Repository};
use serde::Serialize;
use tracing::info;

/// Branch a freshly created repository commits to.
pub const DEFAULT_BRANCH: &str = "master";

/// Input of [`FormulaBootstrapper::create`].
#[derive(Debug, Clone)]
pub struct CreateRequest {
    /// Owner of the application repository
    pub owner: String,
    /// Organization to create the formula repository under
    pub org: Option<String>,
    /// Application (and formula) name
    pub app: String,
    /// Font of the caveats banner
    pub banner: BannerFont,
    /// Create the formula repository as private
    pub private: bool,
    /// The release the formula starts at
    pub release: ReleaseInfo,
}

/// A created formula repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOutcome {
    /// The repository
    pub repository: Repository,
    /// Path of the formula file in it
    pub formula_path: String,
}

/// Creates `homebrew-<app>` repositories.
pub struct FormulaBootstrapper<'a> {
    github: &'a dyn GitHub,
}

impl<'a> FormulaBootstrapper<'a> {
    /// Creates a bootstrapper over `github`.
    #[must_use]
    pub fn new(github: &'a dyn GitHub) -> Self {
        Self { github }
    }

    /// Creates the repository, its README and the formula.
    ///
    /// Steps run in order and stop at the first failure; nothing is undone.
    pub async fn create(&self, request: &CreateRequest) -> Result<CreateOutcome> {
        if request.owner.is_empty() {
            return Err(Error::validation("missing GitHub repository owner"));
        }
        if request.app.is_empty() {
            return Err(Error::validation("missing GitHub repository"));
        }

        let source = RepoRef::new(&request.owner, &request.app);
        let caveats = request.banner.render(&request.app)?;
        let formula = FormulaGenerator::generate(&FormulaData::new(
            &request.app,
            source.html_url(),
            &request.release,
            caveats,
        ));
        let target = FormulaTarget::for_app(&request.owner, request.org.as_deref(), &request.app);

        info!(repo = %target.repo, private = request.private, "Creating a new repository");
        let repository = self
            .github
            .create_repository(&NewRepository {
                org: request.org.clone().filter(|org| !org.is_empty()),
                name: target.repo.name.clone(),
                description: format!("Homebrew formula for {source}"),
                homepage: source.html_url(),
                private: request.private,
            })
            .await?;

        let repo = repository_ref(&repository).unwrap_or_else(|| target.repo.clone());

        info!(repo = %repo, "Creating README.md");
        self.github
            .create_file(
                &repo,
                &FileChange::new("README.md", DEFAULT_BRANCH, "Create README.md", readme(&source)),
            )
            .await?;

        info!(repo = %repo, path = %target.path, "Creating the formula");
        self.github
            .create_file(
                &repo,
                &FileChange::new(target.path.as_str(), DEFAULT_BRANCH, "Create formula", formula),
            )
            .await?;

        Ok(CreateOutcome {
            repository,
            formula_path: target.path,
        })
    }
}

fn repository_ref(repository: &Repository) -> Option<RepoRef> {
    let (owner, name) = repository.full_name.split_once('/')?;
    (!owner.is_empty() && !name.is_empty()).then(|| RepoRef::new(owner, name))
}

fn readme(source: &RepoRef) -> String {
    format!(
        "homebrew-{name}\n====\n\n[Homebrew](http://brew.sh/) formula for [{source}]({url})\n\n",
        name = source.name,
        url = source.html_url(),
    )
}

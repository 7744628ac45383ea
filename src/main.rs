use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use relbump::descriptor::{HelmChart, MavenProject};
use relbump::docker::{self, BuildTags, ImageRef};
use relbump::exec::Shell;
use relbump::helm::{self, ChartRepo};
use relbump::{git, version};

#[derive(Parser)]
#[command(name = "relbump")]
#[command(about = "Release automation with surgical descriptor patching", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose output (echo external commands)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Maven project version commands
    Maven {
        #[command(subcommand)]
        command: MavenCommands,
    },

    /// Helm chart commands
    Helm {
        #[command(subcommand)]
        command: HelmCommands,
    },

    /// Docker image commands
    Docker {
        #[command(subcommand)]
        command: DockerCommands,
    },

    /// Git queries
    Git {
        #[command(subcommand)]
        command: GitCommands,
    },

    /// Release and patch-branch workflows
    Create {
        #[command(subcommand)]
        command: CreateCommands,
    },
}

#[derive(Args)]
struct MavenOpts {
    /// The maven project file
    #[arg(short = 'f', long = "file", default_value = "pom.xml")]
    pom: PathBuf,
}

#[derive(Args)]
struct ChartOpts {
    /// The helm chart file
    #[arg(short = 'c', long = "chart", default_value = "Chart.yaml")]
    chart: PathBuf,
}

#[derive(Args)]
struct GitOpts {
    /// The git hash length
    #[arg(short = 'l', long = "length", default_value_t = 7)]
    length: u32,
}

#[derive(Args)]
struct DockerOpts {
    /// The docker image; defaults to the project artifactId
    #[arg(short = 'i', long = "image")]
    image: Option<String>,

    /// The docker repository
    #[arg(
        short = 'r',
        long = "repository",
        env = "RELBUMP_DOCKER_REPOSITORY",
        default_value = "docker.io"
    )]
    repository: String,
}

#[derive(Args)]
struct ChartDirOpts {
    /// The helm chart directory
    #[arg(short = 'd', long = "chart-dir", default_value = "target/helm")]
    dir: PathBuf,
}

#[derive(Args)]
struct ChartRepoOpts {
    /// The helm chart repository username
    #[arg(short = 'u', long = "username", env = "RELBUMP_HELM_USERNAME")]
    username: Option<String>,

    /// The helm chart repository password
    #[arg(short = 'p', long = "password", env = "RELBUMP_HELM_PASSWORD")]
    password: Option<String>,

    /// The helm chart repository name
    #[arg(short = 'n', long = "repo-name", env = "RELBUMP_HELM_NAME")]
    name: String,

    /// The helm chart repository URL; resolved from `helm repo list` if absent
    #[arg(short = 'e', long = "repo-url", env = "RELBUMP_HELM_URL")]
    url: Option<String>,
}

impl ChartRepoOpts {
    fn into_repo(self) -> ChartRepo {
        ChartRepo {
            name: self.name,
            url: self.url,
            username: self.username,
            password: self.password,
        }
    }
}

#[derive(Subcommand)]
enum MavenCommands {
    /// Show the current maven project version
    Version {
        #[command(flatten)]
        maven: MavenOpts,
    },

    /// Set the release version (drop prerelease and build suffixes)
    SetRelease {
        #[command(flatten)]
        maven: MavenOpts,
    },

    /// Set the snapshot prerelease version
    SetSnapshot {
        #[command(flatten)]
        maven: MavenOpts,
    },

    /// Set the git hash prerelease version
    SetHash {
        #[command(flatten)]
        maven: MavenOpts,

        #[command(flatten)]
        git: GitOpts,
    },
}

#[derive(Subcommand)]
enum HelmCommands {
    /// Show the current chart version
    Version {
        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Set the chart to its release version
    SetRelease {
        #[command(flatten)]
        chart: ChartOpts,
    },

    /// Add the helm chart repository
    AddRepo {
        #[command(flatten)]
        repo: ChartRepoOpts,
    },

    /// Update helm chart repositories
    Update,

    /// Package the helm chart with the project version
    Build {
        #[command(flatten)]
        maven: MavenOpts,

        #[command(flatten)]
        chart_dir: ChartDirOpts,
    },

    /// Push the packaged helm chart
    Push {
        #[command(flatten)]
        maven: MavenOpts,

        #[command(flatten)]
        repo: ChartRepoOpts,
    },

    /// Release the helm chart built for the current commit
    Release {
        #[command(flatten)]
        maven: MavenOpts,

        #[command(flatten)]
        git: GitOpts,

        #[command(flatten)]
        chart_dir: ChartDirOpts,

        #[command(flatten)]
        repo: ChartRepoOpts,
    },
}

#[derive(Subcommand)]
enum DockerCommands {
    /// Write the docker registry config file
    Config {
        /// The docker config content
        #[arg(short = 'c', long = "config", env = "RELBUMP_DOCKER_CONFIG")]
        config: String,

        /// The docker config file
        #[arg(
            short = 'j',
            long = "config-file",
            env = "RELBUMP_DOCKER_CONFIG_FILE",
            default_value = "~/.docker/config.json"
        )]
        config_file: PathBuf,
    },

    /// Build the docker image tagged with the project version
    Build {
        #[command(flatten)]
        maven: MavenOpts,

        #[command(flatten)]
        docker: DockerOpts,

        /// The docker file
        #[arg(
            short = 'd',
            long = "dockerfile",
            env = "RELBUMP_DOCKER_DOCKERFILE"
        )]
        dockerfile: Option<String>,

        /// The docker build context
        #[arg(short = 'c', long = "context", default_value = ".")]
        context: String,

        /// Skip the branch-name image tag
        #[arg(long = "no-branch")]
        no_branch: bool,

        /// Skip the latest image tag
        #[arg(long = "no-latest")]
        no_latest: bool,
    },

    /// Push the docker image tagged with the project version
    Push {
        #[command(flatten)]
        maven: MavenOpts,

        #[command(flatten)]
        docker: DockerOpts,
    },

    /// Release the docker image built for the current commit
    Release {
        #[command(flatten)]
        maven: MavenOpts,

        #[command(flatten)]
        docker: DockerOpts,

        #[command(flatten)]
        git: GitOpts,
    },
}

#[derive(Subcommand)]
enum GitCommands {
    /// Show the current branch
    Branch,

    /// Show the short commit hash
    Hash {
        #[command(flatten)]
        git: GitOpts,
    },
}

#[derive(Subcommand)]
enum CreateCommands {
    /// Tag the release and move to the next development version
    Release {
        #[command(flatten)]
        maven: MavenOpts,

        /// Commit message prefix for the new development version
        #[arg(short = 'm', long = "message", default_value = "Development version ")]
        message: String,
    },

    /// Create a patch branch from a release tag
    Patch {
        #[command(flatten)]
        maven: MavenOpts,

        /// Commit message prefix for the patch development version
        #[arg(short = 'm', long = "message", default_value = "Create patch version ")]
        message: String,

        /// The release tag (x.y.0) to patch
        #[arg(short = 't', long = "tag")]
        tag: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let shell = Shell::new(cli.verbose);

    match cli.command {
        Commands::Maven { command } => match command {
            MavenCommands::Version { maven } => cmd_maven_version(&maven),
            MavenCommands::SetRelease { maven } => cmd_maven_set_release(&maven),
            MavenCommands::SetSnapshot { maven } => cmd_maven_set_snapshot(&maven),
            MavenCommands::SetHash { maven, git } => cmd_maven_set_hash(&shell, &maven, &git),
        },

        Commands::Helm { command } => match command {
            HelmCommands::Version { chart } => cmd_helm_version(&chart),
            HelmCommands::SetRelease { chart } => cmd_helm_set_release(&chart),
            HelmCommands::AddRepo { repo } => cmd_helm_add_repo(&shell, repo),
            HelmCommands::Update => cmd_helm_update(&shell),
            HelmCommands::Build { maven, chart_dir } => cmd_helm_build(&shell, &maven, &chart_dir),
            HelmCommands::Push { maven, repo } => cmd_helm_push(&shell, &maven, repo),
            HelmCommands::Release {
                maven,
                git,
                chart_dir,
                repo,
            } => cmd_helm_release(&shell, &maven, &git, &chart_dir, repo),
        },

        Commands::Docker { command } => match command {
            DockerCommands::Config {
                config,
                config_file,
            } => cmd_docker_config(&config, &config_file),
            DockerCommands::Build {
                maven,
                docker,
                dockerfile,
                context,
                no_branch,
                no_latest,
            } => cmd_docker_build(
                &shell,
                &maven,
                docker,
                dockerfile.as_deref(),
                &context,
                no_branch,
                no_latest,
            ),
            DockerCommands::Push { maven, docker } => cmd_docker_push(&shell, &maven, docker),
            DockerCommands::Release { maven, docker, git } => {
                cmd_docker_release(&shell, &maven, docker, &git)
            }
        },

        Commands::Git { command } => match command {
            GitCommands::Branch => {
                println!("{}", git::branch(&shell)?);
                Ok(())
            }
            GitCommands::Hash { git } => {
                println!("{}", git::hash(&shell, git.length)?);
                Ok(())
            }
        },

        Commands::Create { command } => match command {
            CreateCommands::Release { maven, message } => {
                cmd_create_release(&shell, &maven, &message)
            }
            CreateCommands::Patch {
                maven,
                message,
                tag,
            } => cmd_create_patch(&shell, &maven, &message, &tag),
        },
    }
}

fn report_change(file: &Path, from: &str, to: &str) {
    println!(
        "Change version from {} to {} in {}",
        from.yellow(),
        to.green(),
        file.display()
    );
}

// -- maven ---------------------------------------------------------------

fn cmd_maven_version(maven: &MavenOpts) -> Result<()> {
    let project = MavenProject::load(&maven.pom)?;
    println!("{}", project.version_value());
    Ok(())
}

fn cmd_maven_set_release(maven: &MavenOpts) -> Result<()> {
    let project = MavenProject::load(&maven.pom)?;
    let release = version::release_version(&project.version()?);
    project.set_version(&release.to_string())?;
    report_change(project.file(), project.version_value(), &release.to_string());
    Ok(())
}

fn cmd_maven_set_snapshot(maven: &MavenOpts) -> Result<()> {
    let project = MavenProject::load(&maven.pom)?;
    let snapshot = version::with_prerelease(&project.version()?, version::SNAPSHOT)?;
    project.set_version(&snapshot.to_string())?;
    report_change(project.file(), project.version_value(), &snapshot.to_string());
    Ok(())
}

fn cmd_maven_set_hash(shell: &Shell, maven: &MavenOpts, git_opts: &GitOpts) -> Result<()> {
    let project = MavenProject::load(&maven.pom)?;
    let hash = git::hash(shell, git_opts.length)?;
    let hashed = version::with_prerelease(&project.version()?, &hash)?;
    project.set_version(&hashed.to_string())?;
    report_change(project.file(), project.version_value(), &hashed.to_string());
    Ok(())
}

// -- helm chart descriptor ------------------------------------------------

fn cmd_helm_version(chart: &ChartOpts) -> Result<()> {
    let chart = HelmChart::load(&chart.chart)?;
    println!("{}", chart.version_value());
    Ok(())
}

fn cmd_helm_set_release(chart_opts: &ChartOpts) -> Result<()> {
    let chart = HelmChart::load(&chart_opts.chart)?;
    let release = version::release_version(&chart.version()?);
    chart.set_version(&release.to_string())?;
    report_change(chart.file(), chart.version_value(), &release.to_string());
    Ok(())
}

// -- helm repository driver ----------------------------------------------

fn cmd_helm_add_repo(shell: &Shell, repo: ChartRepoOpts) -> Result<()> {
    let repo = repo.into_repo();
    helm::add_repo(shell, &repo)?;
    println!("Added helm chart repository {}", repo.name.bold());
    Ok(())
}

fn cmd_helm_update(shell: &Shell) -> Result<()> {
    helm::update_repos(shell)?;
    println!("Helm chart repositories updated");
    Ok(())
}

fn cmd_helm_build(shell: &Shell, maven: &MavenOpts, chart_dir: &ChartDirOpts) -> Result<()> {
    let project = MavenProject::load(&maven.pom)?;
    helm::update_repos(shell)?;

    let path = chart_dir.dir.join(project.artifact_id());
    helm::package(shell, &path, project.version_value())?;
    println!("helm package {}", path.display());
    Ok(())
}

fn cmd_helm_push(shell: &Shell, maven: &MavenOpts, repo: ChartRepoOpts) -> Result<()> {
    let project = MavenProject::load(&maven.pom)?;
    let repo = repo.into_repo();
    let archive = format!("{}.tgz", project.artifact_id());
    helm::push(shell, &repo, &archive)?;
    println!("Pushed helm chart {}", archive.bold());
    Ok(())
}

fn cmd_helm_release(
    shell: &Shell,
    maven: &MavenOpts,
    git_opts: &GitOpts,
    chart_dir: &ChartDirOpts,
    repo: ChartRepoOpts,
) -> Result<()> {
    let project = MavenProject::load(&maven.pom)?;
    let repo = repo.into_repo();
    helm::update_repos(shell)?;

    let current = project.version()?;
    let hash = git::hash(shell, git_opts.length)?;
    let build_version = version::with_prerelease(&current, &hash)?;
    let release = version::release_version(&current);

    helm::pull(
        shell,
        &repo.name,
        project.artifact_id(),
        &build_version.to_string(),
        &chart_dir.dir,
    )?;

    let path = chart_dir.dir.join(project.artifact_id());
    helm::package(shell, &path, &release.to_string())?;

    let archive = format!("{}.tgz", project.artifact_id());
    helm::push(shell, &repo, &archive)?;
    println!(
        "Released helm chart {} {}",
        project.artifact_id().bold(),
        release.to_string().green()
    );
    Ok(())
}

// -- docker ---------------------------------------------------------------

fn image_ref(docker: DockerOpts, project: &MavenProject) -> ImageRef {
    let image = docker
        .image
        .unwrap_or_else(|| project.artifact_id().to_string());
    ImageRef::new(docker.repository, image)
}

fn cmd_docker_config(config: &str, config_file: &Path) -> Result<()> {
    if let Some(dir) = config_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(config_file, config)?;
    println!("Wrote docker config {}", config_file.display());
    Ok(())
}

fn cmd_docker_build(
    shell: &Shell,
    maven: &MavenOpts,
    docker_opts: DockerOpts,
    dockerfile: Option<&str>,
    context: &str,
    no_branch: bool,
    no_latest: bool,
) -> Result<()> {
    let project = MavenProject::load(&maven.pom)?;
    let image = image_ref(docker_opts, &project);

    let tags = BuildTags {
        branch: if no_branch {
            None
        } else {
            Some(git::branch(shell)?)
        },
        latest: !no_latest,
    };

    let names = docker::build(
        shell,
        &image,
        project.version_value(),
        &tags,
        dockerfile,
        context,
    )?;
    println!("Docker build new images [{}]", names.join(", ").bold());
    Ok(())
}

fn cmd_docker_push(shell: &Shell, maven: &MavenOpts, docker_opts: DockerOpts) -> Result<()> {
    let project = MavenProject::load(&maven.pom)?;
    let image = image_ref(docker_opts, &project);
    let name = image.name(Some(project.version_value()));
    docker::push(shell, &name)?;
    println!("docker push {}", name.bold());
    Ok(())
}

fn cmd_docker_release(
    shell: &Shell,
    maven: &MavenOpts,
    docker_opts: DockerOpts,
    git_opts: &GitOpts,
) -> Result<()> {
    let project = MavenProject::load(&maven.pom)?;
    let image = image_ref(docker_opts, &project);

    let current = project.version()?;
    let hash = git::hash(shell, git_opts.length)?;
    let pull_tag = version::with_prerelease(&current, &hash)?.to_string();
    let release_tag = version::release_version(&current).to_string();

    let name = docker::release(shell, &image, &pull_tag, &release_tag)?;
    println!("Docker push new release image: {}", name.green());
    Ok(())
}

// -- release workflows ----------------------------------------------------

fn cmd_create_release(shell: &Shell, maven: &MavenOpts, message: &str) -> Result<()> {
    let project = MavenProject::load(&maven.pom)?;
    let current = project.version()?;
    let release = version::release_version(&current);

    git::tag(shell, &release.to_string())?;

    let next = version::next_dev_version(&current)?;
    project.set_version(&next.to_string())?;
    report_change(project.file(), project.version_value(), &next.to_string());

    git::add_all(shell)?;
    git::commit(shell, &format!("{message}{next}"))?;
    git::push_heads_and_tags(shell)?;

    println!("New release created: {}", release.to_string().green());
    Ok(())
}

fn cmd_create_patch(shell: &Shell, maven: &MavenOpts, message: &str, tag: &str) -> Result<()> {
    let tag_version = version::parse(tag)?;
    version::patch_base(&tag_version)?;

    let branch = version::patch_branch(&tag_version);
    git::checkout_new(shell, &branch, tag)?;

    let project = MavenProject::load(&maven.pom)?;
    let next = version::bump_patch(&tag_version, Some(version::SNAPSHOT))?;
    project.set_version(&next.to_string())?;
    report_change(project.file(), project.version_value(), &next.to_string());

    git::add_all(shell)?;
    git::commit(shell, &format!("{message}{next}"))?;
    git::push_upstream(shell, &branch)?;

    println!("New patch branch created: {}", branch.green());
    Ok(())
}

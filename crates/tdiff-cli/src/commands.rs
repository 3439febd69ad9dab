use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::{ColoredString, Colorize};
use tdiff_engine::{CancellationToken, DiffInput, DiffSummary, Differencer, ResultTree, VisitCounter};
use tdiff_structure::{DefaultStructure, FilterConfig, FsFilter, FsNode, StreamEquality};
use tdiff_types::{ChangeCode, ChangeKind};
use tracing::debug;

use crate::cli::*;

/// What a successful command found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Identical,
    Different,
}

pub fn run_command(cli: Cli) -> anyhow::Result<Outcome> {
    let config = load_config(cli.config.as_deref(), cli.exclude)?;
    match cli.command {
        Command::Compare(args) => cmd_compare(&config, &args, cli.format),
        Command::Status(args) => cmd_status(&config, &args, cli.format),
    }
}

fn load_config(path: Option<&Path>, exclude: Vec<String>) -> anyhow::Result<FilterConfig> {
    let mut config = match path {
        Some(path) => FilterConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FilterConfig::default(),
    };
    config.exclude.extend(exclude);
    Ok(config)
}

fn cmd_compare(config: &FilterConfig, args: &TreeArgs, format: OutputFormat) -> anyhow::Result<Outcome> {
    let tree = diff_trees(config, args)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree.to_report())?),
        OutputFormat::Text if tree.is_empty() => {
            println!("{} No differences.", "✓".green().bold());
        }
        OutputFormat::Text => print!("{}", render_tree(&tree)),
    }
    Ok(outcome(&tree))
}

fn cmd_status(config: &FilterConfig, args: &TreeArgs, format: OutputFormat) -> anyhow::Result<Outcome> {
    let tree = diff_trees(config, args)?;
    let summary = tree.summary();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print!("{}", render_summary(&summary)),
    }
    Ok(outcome(&tree))
}

fn outcome(tree: &ResultTree<FsNode>) -> Outcome {
    if tree.is_empty() {
        Outcome::Identical
    } else {
        Outcome::Different
    }
}

fn diff_trees(config: &FilterConfig, args: &TreeArgs) -> anyhow::Result<ResultTree<FsNode>> {
    let filter = Arc::new(FsFilter::new(config).context("invalid exclude pattern")?);
    let open = |path: &Path| {
        FsNode::root(path, Arc::clone(&filter))
            .with_context(|| format!("cannot open {}", path.display()))
    };
    let left = open(&args.left)?;
    let right = open(&args.right)?;
    let ancestor = args.ancestor.as_deref().map(open).transpose()?;

    let input = match &ancestor {
        Some(ancestor) => DiffInput::three_way(Some(ancestor), Some(&left), Some(&right)),
        None => DiffInput::two_way(Some(&left), Some(&right)),
    };
    let counter = VisitCounter::new();
    let differencer = Differencer::new(DefaultStructure, StreamEquality::with_buffer_size(config.buffer_size))
        .with_progress(counter.clone());
    let tree = differencer.diff_tree(input, &CancellationToken::new())?;
    debug!(visited = counter.count(), changed = tree.len(), "comparison finished");
    Ok(tree)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_tree(tree: &ResultTree<FsNode>) -> String {
    let mut out = String::new();
    for (id, depth) in tree.walk() {
        let node = &tree[id];
        let is_dir = node
            .left()
            .or(node.right())
            .or(node.ancestor())
            .is_some_and(FsNode::is_dir);
        let name = if is_dir {
            format!("{}/", tree.name(id)).bold()
        } else {
            tree.name(id).normal()
        };
        out.push_str(&format!("{}{} {}  {}\n", "  ".repeat(depth), marker(node.code()), name, label(node.code())));
    }
    out
}

fn marker(code: ChangeCode) -> &'static str {
    match code.kind() {
        ChangeKind::NoChange => " ",
        ChangeKind::Addition => "+",
        ChangeKind::Deletion => "-",
        ChangeKind::Change => "~",
    }
}

fn label(code: ChangeCode) -> ColoredString {
    let text = code.to_string();
    if code.is_pseudo_conflict() {
        text.yellow()
    } else if code.is_conflict() {
        text.red().bold()
    } else {
        match code.kind() {
            ChangeKind::Addition => text.green(),
            ChangeKind::Deletion => text.red(),
            ChangeKind::Change => text.cyan(),
            ChangeKind::NoChange => text.dimmed(),
        }
    }
}

fn render_summary(summary: &DiffSummary) -> String {
    if summary.is_clean() {
        return format!("{} No differences.\n", "✓".green().bold());
    }
    let mut out = format!("{} differing entries\n", summary.total().to_string().bold());
    out.push_str(&format!("  {} {}\n", "added:".green(), summary.additions));
    out.push_str(&format!("  {} {}\n", "deleted:".red(), summary.deletions));
    out.push_str(&format!("  {} {}\n", "changed:".cyan(), summary.changes));
    if summary.conflicts > 0 {
        out.push_str(&format!(
            "  {} {} ({} pseudo)\n",
            "conflicts:".red().bold(),
            summary.conflicts,
            summary.pseudo_conflicts
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn args(left: &Path, right: &Path, ancestor: Option<&Path>) -> TreeArgs {
        TreeArgs {
            left: left.to_path_buf(),
            right: right.to_path_buf(),
            ancestor: ancestor.map(PathBuf::from),
        }
    }

    fn sample(root: &Path) {
        write(root, "README.md", "hello");
        write(root, "src/lib.rs", "pub fn f() {}");
        write(root, "src/main.rs", "fn main() {}");
    }

    #[test]
    fn identical_directories() {
        let left = tempfile::tempdir().unwrap();
        let right = tempfile::tempdir().unwrap();
        sample(left.path());
        sample(right.path());

        let tree = diff_trees(&FilterConfig::default(), &args(left.path(), right.path(), None)).unwrap();
        assert_eq!(outcome(&tree), Outcome::Identical);
    }

    #[test]
    fn two_way_changes_render_as_a_tree() {
        colored::control::set_override(false);
        let left = tempfile::tempdir().unwrap();
        let right = tempfile::tempdir().unwrap();
        sample(left.path());
        sample(right.path());
        write(right.path(), "src/main.rs", "fn main() { run() }");
        write(right.path(), "NOTES", "new");

        let tree = diff_trees(&FilterConfig::default(), &args(left.path(), right.path(), None)).unwrap();
        assert_eq!(outcome(&tree), Outcome::Different);

        let text = render_tree(&tree);
        assert!(text.contains("+ NOTES  addition"), "{text}");
        assert!(text.contains("  ~ src/  change"), "{text}");
        assert!(text.contains("    ~ main.rs  change"), "{text}");
        assert!(!text.contains("lib.rs"), "{text}");
    }

    #[test]
    fn three_way_reports_directions() {
        let ancestor = tempfile::tempdir().unwrap();
        let left = tempfile::tempdir().unwrap();
        let right = tempfile::tempdir().unwrap();
        for dir in [&ancestor, &left, &right] {
            sample(dir.path());
        }
        write(left.path(), "README.md", "hello, world");
        write(right.path(), "src/lib.rs", "pub fn g() {}");

        let tree = diff_trees(
            &FilterConfig::default(),
            &args(left.path(), right.path(), Some(ancestor.path())),
        )
        .unwrap();
        let top = tree.top().unwrap();
        assert!(tree[top].is_conflict());
        let readme = tree.find_child(top, "README.md").unwrap();
        assert_eq!(tree[readme].code(), ChangeCode::LEFT | ChangeCode::CHANGE);

        let summary = tree.summary();
        assert_eq!(summary.changes, 2);
        assert_eq!(summary.conflicts, 0);
    }

    #[test]
    fn directory_deleted_on_both_sides_keeps_its_slash() {
        colored::control::set_override(false);
        let ancestor = tempfile::tempdir().unwrap();
        let left = tempfile::tempdir().unwrap();
        let right = tempfile::tempdir().unwrap();
        for dir in [&ancestor, &left, &right] {
            sample(dir.path());
        }
        write(ancestor.path(), "old/notes.txt", "gone");

        let tree = diff_trees(
            &FilterConfig::default(),
            &args(left.path(), right.path(), Some(ancestor.path())),
        )
        .unwrap();
        let top = tree.top().unwrap();
        let old = tree.find_child(top, "old").unwrap();
        assert_eq!(
            tree[old].code(),
            ChangeCode::CONFLICTING | ChangeCode::DELETION | ChangeCode::PSEUDO_CONFLICT
        );

        let text = render_tree(&tree);
        assert!(text.contains("- old/  conflicting deletion (pseudo)"), "{text}");
    }

    #[test]
    fn excluded_entries_are_not_compared() {
        let left = tempfile::tempdir().unwrap();
        let right = tempfile::tempdir().unwrap();
        sample(left.path());
        sample(right.path());
        write(right.path(), "target/debug/out", "binary");

        let config = load_config(None, vec!["target/".to_string()]).unwrap();
        let tree = diff_trees(&config, &args(left.path(), right.path(), None)).unwrap();
        assert_eq!(outcome(&tree), Outcome::Identical);
    }

    #[test]
    fn missing_input_is_an_error() {
        let left = tempfile::tempdir().unwrap();
        let err = diff_trees(
            &FilterConfig::default(),
            &args(left.path(), Path::new("/no/such/tdiff/dir"), None),
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot open"));
    }

    #[test]
    fn summary_text() {
        colored::control::set_override(false);
        let clean = render_summary(&DiffSummary::default());
        assert!(clean.contains("No differences"));

        let summary = DiffSummary {
            additions: 1,
            changes: 2,
            conflicts: 1,
            pseudo_conflicts: 1,
            ..Default::default()
        };
        let text = render_summary(&summary);
        assert!(text.starts_with("3 differing entries"));
        assert!(text.contains("conflicts: 1 (1 pseudo)"));
    }
}

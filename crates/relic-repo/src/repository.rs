//! The repository facade.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use relic_graph::{find_merge_base, CommitCache, History};
use relic_merge::{conflict_contents, plan_merge};
use relic_refs::{FsRefStore, RefError, RefStore};
use relic_stage::Stage;
use relic_store::{load_blob, load_commit, Blob, Commit, FsObjectStore, ObjectKind, ObjectStore};
use relic_types::{ObjectId, Timestamp};
use tracing::{debug, info};

use crate::error::{RepoError, RepoResult};
use crate::report::{
    LogEntry, MergeReport, ModificationEntry, ModificationKind, StatusReport,
};
use crate::workdir;

/// Name of the repository metadata directory inside the working directory.
pub const META_DIR_NAME: &str = ".relic";
/// Name of the serialized stage file inside the metadata directory.
const STAGE_FILE: &str = "STAGE";
/// The branch created by `init`.
pub const DEFAULT_BRANCH: &str = "main";

/// A Relic repository rooted at one working directory.
///
/// Operations load the stage and refs from disk at the start, run to
/// completion in memory, and write the full state back at the end. On any
/// error the operation aborts with the on-disk state unchanged.
pub struct Repository {
    workdir: PathBuf,
    meta_dir: PathBuf,
    objects: FsObjectStore,
    refs: FsRefStore,
}

impl Repository {
    // ---------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------

    /// Initialize a new repository in `workdir`.
    ///
    /// Creates the metadata layout, stores the root commit, points the
    /// default branch at it, and writes an empty stage. Fails with
    /// [`RepoError::AlreadyInitialized`] if a repository already exists.
    pub fn init(workdir: &Path) -> RepoResult<Self> {
        let meta_dir = workdir.join(META_DIR_NAME);
        if meta_dir.exists() {
            return Err(RepoError::AlreadyInitialized(workdir.to_path_buf()));
        }
        fs::create_dir_all(&meta_dir)?;

        let objects = FsObjectStore::open(&meta_dir.join("objects"))?;
        let refs = FsRefStore::open(&meta_dir)?;

        let root = Commit::root();
        let root_id = objects.write(&root.to_stored_object()?)?;
        refs.create_branch(DEFAULT_BRANCH, root_id)?;
        refs.set_head(DEFAULT_BRANCH)?;

        let repo = Self {
            workdir: workdir.to_path_buf(),
            meta_dir,
            objects,
            refs,
        };
        repo.save_stage(&Stage::new())?;

        info!(workdir = %workdir.display(), root = %root_id.short_hex(), "initialized repository");
        Ok(repo)
    }

    /// Open an existing repository in `workdir`.
    ///
    /// Fails with [`RepoError::NotInitialized`] if none exists.
    pub fn open(workdir: &Path) -> RepoResult<Self> {
        let meta_dir = workdir.join(META_DIR_NAME);
        if !meta_dir.is_dir() {
            return Err(RepoError::NotInitialized(workdir.to_path_buf()));
        }
        Ok(Self {
            workdir: workdir.to_path_buf(),
            objects: FsObjectStore::open(&meta_dir.join("objects"))?,
            refs: FsRefStore::open(&meta_dir)?,
            meta_dir,
        })
    }

    /// The working directory this repository operates on.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    // ---------------------------------------------------------------
    // Staging
    // ---------------------------------------------------------------

    /// Stage a file's current content for the next commit.
    pub fn add(&self, path: &str) -> RepoResult<()> {
        if !workdir::file_exists(&self.workdir, path) {
            return Err(RepoError::FileNotFound {
                path: path.to_string(),
            });
        }

        let mut stage = self.load_stage()?;
        let data = workdir::read_file(&self.workdir, path)?;
        let blob = Blob::new(path, data);
        let stored = blob.to_stored_object()?;
        let blob_id = stored.compute_id();

        stage.add(path, blob_id);
        if stage.added().contains_key(path) {
            // Persist only content that actually became pending; re-adding
            // tracked content resolves to a blob the store already holds.
            self.objects.write(&stored)?;
        }

        self.save_stage(&stage)?;
        debug!(path, blob = %blob_id.short_hex(), "staged");
        Ok(())
    }

    /// Unstage a path, or stage a tracked path for removal and delete its
    /// working copy.
    pub fn remove(&self, path: &str) -> RepoResult<()> {
        let mut stage = self.load_stage()?;
        let removal = stage.remove(path)?;
        if removal.delete_working_copy {
            workdir::delete_file(&self.workdir, path)?;
        }
        self.save_stage(&stage)?;
        debug!(path, "removed");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Committing
    // ---------------------------------------------------------------

    /// Commit the staged changes. Returns the new commit's ID.
    pub fn commit(&self, message: &str) -> RepoResult<ObjectId> {
        if message.is_empty() {
            return Err(RepoError::EmptyMessage);
        }

        let mut stage = self.load_stage()?;
        let tree = stage.commit_changes()?;

        let (parent_id, _) = self.current_commit()?;
        let commit = Commit::new(message, Timestamp::now(), vec![parent_id], tree);
        let commit_id = self.objects.write(&commit.to_stored_object()?)?;

        let branch = self.current_branch()?;
        self.refs.move_branch(&branch.name, commit_id)?;
        self.save_stage(&stage)?;

        info!(commit = %commit_id.short_hex(), branch = %branch.name, "committed");
        Ok(commit_id)
    }

    // ---------------------------------------------------------------
    // History queries
    // ---------------------------------------------------------------

    /// The first-parent history from the current commit back to the root.
    pub fn log(&self) -> RepoResult<Vec<LogEntry>> {
        let (tip, _) = self.current_commit()?;
        let mut entries = Vec::new();
        for step in History::from(&self.objects, tip) {
            let entry = step?;
            entries.push(LogEntry {
                id: entry.id,
                parents: entry.commit.parents,
                timestamp: entry.commit.timestamp,
                message: entry.commit.message,
            });
        }
        Ok(entries)
    }

    /// Every commit in the object store, in ID order.
    pub fn global_log(&self) -> RepoResult<Vec<LogEntry>> {
        let mut entries = Vec::new();
        for id in self.objects.all_ids()? {
            let Some(obj) = self.objects.read(&id)? else {
                continue;
            };
            if obj.kind != ObjectKind::Commit {
                continue;
            }
            let commit = Commit::from_stored_object(&obj)?;
            entries.push(LogEntry {
                id,
                parents: commit.parents,
                timestamp: commit.timestamp,
                message: commit.message,
            });
        }
        Ok(entries)
    }

    /// IDs of every commit whose message matches exactly.
    ///
    /// Fails with [`RepoError::NoCommitWithMessage`] when nothing matches.
    pub fn find(&self, message: &str) -> RepoResult<Vec<ObjectId>> {
        let ids: Vec<ObjectId> = self
            .global_log()?
            .into_iter()
            .filter(|entry| entry.message == message)
            .map(|entry| entry.id)
            .collect();
        if ids.is_empty() {
            return Err(RepoError::NoCommitWithMessage {
                message: message.to_string(),
            });
        }
        Ok(ids)
    }

    /// The full repository status.
    pub fn status(&self) -> RepoResult<StatusReport> {
        let stage = self.load_stage()?;
        let branch = self.current_branch()?;

        let branches = self
            .refs
            .branches()?
            .into_iter()
            .map(|b| b.name)
            .collect();

        // Hash every working file once; comparisons below are by blob ID.
        let mut working: BTreeMap<String, ObjectId> = BTreeMap::new();
        for path in workdir::working_paths(&self.workdir)? {
            let data = workdir::read_file(&self.workdir, &path)?;
            working.insert(path.clone(), Blob::new(&path, data).object_id()?);
        }

        let mut modifications = Vec::new();
        // Tracked paths changed or deleted behind the stage's back.
        for (path, tracked_id) in stage.tracked() {
            match working.get(path) {
                None => {
                    if !stage.removed().contains(path) {
                        modifications.push(ModificationEntry {
                            path: path.clone(),
                            kind: ModificationKind::Deleted,
                        });
                    }
                }
                Some(working_id) if working_id != tracked_id => {
                    if stage.added().get(path) != Some(working_id) {
                        modifications.push(ModificationEntry {
                            path: path.clone(),
                            kind: ModificationKind::Modified,
                        });
                    }
                }
                _ => {}
            }
        }
        // Staged-but-untracked paths changed or deleted after staging.
        for (path, staged_id) in stage.added() {
            if stage.tracked().contains_key(path) {
                continue;
            }
            match working.get(path) {
                None => modifications.push(ModificationEntry {
                    path: path.clone(),
                    kind: ModificationKind::Deleted,
                }),
                Some(working_id) if working_id != staged_id => {
                    modifications.push(ModificationEntry {
                        path: path.clone(),
                        kind: ModificationKind::Modified,
                    });
                }
                _ => {}
            }
        }
        modifications.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(StatusReport {
            current_branch: branch.name,
            branches,
            staged: stage.added().keys().cloned().collect(),
            removed: stage.removed().iter().cloned().collect(),
            modifications,
            untracked: self.untracked_paths(&stage)?,
        })
    }

    // ---------------------------------------------------------------
    // Checkout / reset
    // ---------------------------------------------------------------

    /// Restore one path from the current commit.
    pub fn checkout_path(&self, path: &str) -> RepoResult<()> {
        let (_, commit) = self.current_commit()?;
        self.restore_path(&commit, path)
    }

    /// Restore one path from a specific commit.
    pub fn checkout_path_at(&self, commit_id: ObjectId, path: &str) -> RepoResult<()> {
        let commit = self.commit_by_id(commit_id)?;
        self.restore_path(&commit, path)
    }

    /// Switch to another branch, restoring its tree into the working
    /// directory.
    pub fn checkout_branch(&self, name: &str) -> RepoResult<()> {
        let current = self.current_branch()?;
        if current.name == name {
            return Err(RepoError::CannotActOnCurrentBranch {
                name: name.to_string(),
            });
        }
        let target = self
            .refs
            .read_branch(name)?
            .ok_or_else(|| RepoError::BranchNotFound {
                name: name.to_string(),
            })?;

        let commit = self.commit_by_id(target.target)?;
        let mut stage = self.load_stage()?;
        self.checkout_commit(&mut stage, &commit)?;
        self.refs.set_head(name)?;
        self.save_stage(&stage)?;

        info!(branch = name, "checked out branch");
        Ok(())
    }

    /// Restore a commit's tree and move the current branch pointer to it.
    pub fn reset(&self, commit_id: ObjectId) -> RepoResult<()> {
        let commit = self.commit_by_id(commit_id)?;
        let mut stage = self.load_stage()?;
        self.checkout_commit(&mut stage, &commit)?;

        let branch = self.current_branch()?;
        self.refs.move_branch(&branch.name, commit_id)?;
        self.save_stage(&stage)?;

        info!(commit = %commit_id.short_hex(), branch = %branch.name, "reset");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Branching
    // ---------------------------------------------------------------

    /// Create a branch at the current commit.
    pub fn branch(&self, name: &str) -> RepoResult<()> {
        let (tip, _) = self.current_commit()?;
        match self.refs.create_branch(name, tip) {
            Err(RefError::AlreadyExists { name }) => Err(RepoError::BranchAlreadyExists { name }),
            other => Ok(other?),
        }
    }

    /// Delete a branch (never the current one).
    pub fn remove_branch(&self, name: &str) -> RepoResult<()> {
        match self.refs.delete_branch(name) {
            Err(RefError::NotFound { name }) => Err(RepoError::BranchNotFound { name }),
            Err(RefError::DeleteCurrentBranch { name }) => {
                Err(RepoError::CannotActOnCurrentBranch { name })
            }
            other => Ok(other?),
        }
    }

    /// All branches, sorted by name.
    pub fn branches(&self) -> RepoResult<Vec<relic_refs::Branch>> {
        Ok(self.refs.branches()?)
    }

    // ---------------------------------------------------------------
    // Merging
    // ---------------------------------------------------------------

    /// Merge another branch into the current one.
    ///
    /// Short circuits: if the other tip is already an ancestor of the
    /// current tip the merge is a no-op; if the current tip is an ancestor
    /// of the other tip the current branch is fast-forwarded without a new
    /// commit. Otherwise a two-parent merge commit `[current, other]` is
    /// created, with conflict blobs synthesized for divergent paths.
    pub fn merge(&self, name: &str) -> RepoResult<MergeReport> {
        let mut stage = self.load_stage()?;
        if !stage.is_clean() {
            return Err(RepoError::UncommittedChanges);
        }

        let other_branch =
            self.refs
                .read_branch(name)?
                .ok_or_else(|| RepoError::BranchNotFound {
                    name: name.to_string(),
                })?;
        let current_branch = self.current_branch()?;
        if current_branch.name == name {
            return Err(RepoError::CannotActOnCurrentBranch {
                name: name.to_string(),
            });
        }

        let current_id = current_branch.target;
        let other_id = other_branch.target;

        let mut cache = CommitCache::new(&self.objects);
        let split_id = find_merge_base(&mut cache, current_id, other_id)?;

        if split_id == other_id {
            debug!(other = name, "merge is a no-op: already an ancestor");
            return Ok(MergeReport::AlreadyMerged);
        }
        if split_id == current_id {
            // Fast-forward: bring the working tree to the other tip and
            // move the current branch pointer; no commit is created.
            let other_commit = self.commit_by_id(other_id)?;
            self.checkout_commit(&mut stage, &other_commit)?;
            self.refs.move_branch(&current_branch.name, other_id)?;
            self.save_stage(&stage)?;
            info!(branch = %current_branch.name, target = %other_id.short_hex(), "fast-forwarded");
            return Ok(MergeReport::FastForward { target: other_id });
        }

        let split = self.commit_by_id(split_id)?;
        let current = self.commit_by_id(current_id)?;
        let other = self.commit_by_id(other_id)?;

        let plan = plan_merge(&split, &current, &other);

        // Guard before any write: nothing the merge would create or
        // overwrite may shadow an untracked file.
        let untracked = self.untracked_paths(&stage)?;
        let touched = plan.touched_paths();
        if let Some(path) = untracked.into_iter().find(|p| touched.contains(p)) {
            return Err(RepoError::WouldOverwriteUntracked { path });
        }

        let mut tree = plan.resolved_tree(&current.tree);

        // Synthesize conflict blobs and track them as the paths' new content.
        let conflicts: Vec<String> = plan.conflicts.keys().cloned().collect();
        for (path, sides) in &plan.conflicts {
            let current_data = match sides.current {
                Some(id) => Some(load_blob(&self.objects, &id)?.data),
                None => None,
            };
            let other_data = match sides.other {
                Some(id) => Some(load_blob(&self.objects, &id)?.data),
                None => None,
            };
            let merged = conflict_contents(current_data.as_deref(), other_data.as_deref());

            let blob = Blob::new(path.as_str(), merged.clone());
            let blob_id = self.objects.write(&blob.to_stored_object()?)?;
            tree.insert(path.clone(), blob_id);
            workdir::write_file(&self.workdir, path, &merged)?;
        }

        // Materialize the resolved takes and removals in the working tree.
        for (path, blob_id) in &plan.take_other {
            let blob = load_blob(&self.objects, blob_id)?;
            workdir::write_file(&self.workdir, path, &blob.data)?;
        }
        for path in &plan.remove {
            workdir::delete_file(&self.workdir, path)?;
        }

        let message = format!("Merged {} into {}.", name, current_branch.name);
        let commit = Commit::new(
            message,
            Timestamp::now(),
            vec![current_id, other_id],
            tree.clone(),
        );
        let commit_id = self.objects.write(&commit.to_stored_object()?)?;

        self.refs.move_branch(&current_branch.name, commit_id)?;
        stage.reset_to(&tree);
        self.save_stage(&stage)?;

        info!(
            commit = %commit_id.short_hex(),
            conflicts = conflicts.len(),
            "merged {name} into {}", current_branch.name
        );
        Ok(MergeReport::Merged {
            commit: commit_id,
            conflicts,
        })
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn stage_path(&self) -> PathBuf {
        self.meta_dir.join(STAGE_FILE)
    }

    fn load_stage(&self) -> RepoResult<Stage> {
        let bytes = fs::read(self.stage_path())?;
        bincode::deserialize(&bytes).map_err(|e| RepoError::Corrupt(format!("stage file: {e}")))
    }

    fn save_stage(&self, stage: &Stage) -> RepoResult<()> {
        let bytes = bincode::serialize(stage)
            .map_err(|e| RepoError::Corrupt(format!("stage file: {e}")))?;
        fs::write(self.stage_path(), bytes)?;
        Ok(())
    }

    fn current_branch(&self) -> RepoResult<relic_refs::Branch> {
        let name = self
            .refs
            .head()?
            .ok_or_else(|| RepoError::Corrupt("HEAD is not set".into()))?;
        self.refs
            .read_branch(&name)?
            .ok_or(RepoError::BranchNotFound { name })
    }

    fn current_commit(&self) -> RepoResult<(ObjectId, Commit)> {
        let branch = self.current_branch()?;
        let commit = load_commit(&self.objects, &branch.target)?;
        Ok((branch.target, commit))
    }

    fn commit_by_id(&self, id: ObjectId) -> RepoResult<Commit> {
        match self.objects.read(&id)? {
            Some(obj) if obj.kind == ObjectKind::Commit => Ok(Commit::from_stored_object(&obj)?),
            _ => Err(RepoError::CommitNotFound { id }),
        }
    }

    /// Files on disk the stage knows nothing about: neither tracked nor
    /// staged for addition. A path staged for removal but present on disk
    /// again counts as untracked.
    fn untracked_paths(&self, stage: &Stage) -> RepoResult<Vec<String>> {
        let mut untracked = Vec::new();
        for path in workdir::working_paths(&self.workdir)? {
            if !stage.knows(&path) || stage.removed().contains(&path) {
                untracked.push(path);
            }
        }
        Ok(untracked)
    }

    /// Write one tracked path of `commit` into the working directory.
    fn restore_path(&self, commit: &Commit, path: &str) -> RepoResult<()> {
        let blob_id = commit
            .tracked(path)
            .ok_or_else(|| RepoError::PathNotInCommit {
                path: path.to_string(),
            })?;
        let blob = load_blob(&self.objects, blob_id)?;
        workdir::write_file(&self.workdir, path, &blob.data)
    }

    /// Restore a full commit tree into the working directory: the shared
    /// machinery of checkout-branch, reset, and fast-forward.
    ///
    /// Aborts with [`RepoError::WouldOverwriteUntracked`] before touching
    /// any file if an untracked path would be overwritten. Files tracked by
    /// the current commit but absent from the target are deleted, and the
    /// stage is reset to the target tree.
    fn checkout_commit(&self, stage: &mut Stage, target: &Commit) -> RepoResult<()> {
        let (_, current) = self.current_commit()?;

        let untracked = self.untracked_paths(stage)?;
        if let Some(path) = untracked
            .into_iter()
            .find(|p| target.tree.contains_key(p))
        {
            return Err(RepoError::WouldOverwriteUntracked { path });
        }

        for path in target.tree.keys() {
            self.restore_path(target, path)?;
        }
        for path in current.tree.keys() {
            if !target.tree.contains_key(path) {
                workdir::delete_file(&self.workdir, path)?;
            }
        }

        stage.reset_to(&target.tree);
        Ok(())
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("workdir", &self.workdir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ModificationKind;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn read(dir: &TempDir, name: &str) -> String {
        fs::read_to_string(dir.path().join(name)).unwrap()
    }

    fn exists(dir: &TempDir, name: &str) -> bool {
        dir.path().join(name).exists()
    }

    // -----------------------------------------------------------------
    // init / open
    // -----------------------------------------------------------------

    #[test]
    fn init_creates_layout_and_root_commit() {
        let (dir, repo) = init_repo();
        assert!(dir.path().join(META_DIR_NAME).join("objects").is_dir());
        assert!(dir.path().join(META_DIR_NAME).join("refs/heads/main").is_file());
        assert!(dir.path().join(META_DIR_NAME).join("HEAD").is_file());
        assert!(dir.path().join(META_DIR_NAME).join("STAGE").is_file());

        let log = repo.log().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].message, "initial commit");
        assert!(log[0].parents.is_empty());
    }

    #[test]
    fn init_twice_fails() {
        let (dir, _repo) = init_repo();
        let err = Repository::init(dir.path()).unwrap_err();
        assert!(matches!(err, RepoError::AlreadyInitialized(_)));
    }

    #[test]
    fn root_commit_id_is_identical_across_repositories() {
        let (_d1, r1) = init_repo();
        let (_d2, r2) = init_repo();
        assert_eq!(r1.log().unwrap()[0].id, r2.log().unwrap()[0].id);
    }

    #[test]
    fn open_without_init_fails() {
        let dir = TempDir::new().unwrap();
        let err = Repository::open(dir.path()).unwrap_err();
        assert!(matches!(err, RepoError::NotInitialized(_)));
    }

    #[test]
    fn open_finds_existing_repository() {
        let (dir, repo) = init_repo();
        write(&dir, "a.txt", "a");
        repo.add("a.txt").unwrap();
        repo.commit("add a").unwrap();
        drop(repo);

        let reopened = Repository::open(dir.path()).unwrap();
        assert_eq!(reopened.log().unwrap()[0].message, "add a");
    }

    // -----------------------------------------------------------------
    // add / remove / commit
    // -----------------------------------------------------------------

    #[test]
    fn add_then_commit_tracks_the_content() {
        let (dir, repo) = init_repo();
        write(&dir, "hello.txt", "hello world\n");
        repo.add("hello.txt").unwrap();
        let commit_id = repo.commit("add hello").unwrap();

        let commit = repo.commit_by_id(commit_id).unwrap();
        let blob_id = commit.tracked("hello.txt").expect("tracked");
        let blob = load_blob(&repo.objects, blob_id).unwrap();
        assert_eq!(blob.data, b"hello world\n");
        assert_eq!(blob.path, "hello.txt");
    }

    #[test]
    fn add_missing_file_fails() {
        let (_dir, repo) = init_repo();
        let err = repo.add("ghost.txt").unwrap_err();
        assert!(matches!(err, RepoError::FileNotFound { .. }));
    }

    #[test]
    fn re_adding_committed_content_is_a_net_noop() {
        let (dir, repo) = init_repo();
        write(&dir, "a.txt", "same");
        repo.add("a.txt").unwrap();
        repo.commit("add a").unwrap();

        repo.add("a.txt").unwrap();
        let status = repo.status().unwrap();
        assert!(status.staged.is_empty());

        let err = repo.commit("nothing").unwrap_err();
        assert!(matches!(err, RepoError::NoChanges));
    }

    #[test]
    fn commit_requires_a_message() {
        let (dir, repo) = init_repo();
        write(&dir, "a.txt", "a");
        repo.add("a.txt").unwrap();
        let err = repo.commit("").unwrap_err();
        assert!(matches!(err, RepoError::EmptyMessage));
    }

    #[test]
    fn commit_without_changes_fails() {
        let (_dir, repo) = init_repo();
        let err = repo.commit("empty").unwrap_err();
        assert!(matches!(err, RepoError::NoChanges));
    }

    #[test]
    fn commit_advances_the_current_branch() {
        let (dir, repo) = init_repo();
        write(&dir, "a.txt", "a");
        repo.add("a.txt").unwrap();
        let commit_id = repo.commit("add a").unwrap();

        let branch = repo.current_branch().unwrap();
        assert_eq!(branch.target, commit_id);
    }

    #[test]
    fn remove_tracked_file_deletes_working_copy() {
        let (dir, repo) = init_repo();
        write(&dir, "doomed.txt", "bye");
        repo.add("doomed.txt").unwrap();
        repo.commit("add doomed").unwrap();

        repo.remove("doomed.txt").unwrap();
        assert!(!exists(&dir, "doomed.txt"));

        let commit_id = repo.commit("remove doomed").unwrap();
        let commit = repo.commit_by_id(commit_id).unwrap();
        assert!(commit.tracked("doomed.txt").is_none());
    }

    #[test]
    fn remove_staged_only_file_keeps_working_copy() {
        let (dir, repo) = init_repo();
        write(&dir, "kept.txt", "still here");
        repo.add("kept.txt").unwrap();

        repo.remove("kept.txt").unwrap();
        assert!(exists(&dir, "kept.txt"));
        assert!(repo.status().unwrap().staged.is_empty());
    }

    #[test]
    fn remove_unknown_file_fails() {
        let (_dir, repo) = init_repo();
        let err = repo.remove("stranger.txt").unwrap_err();
        assert!(matches!(err, RepoError::NothingToRemove { .. }));
    }

    // -----------------------------------------------------------------
    // log / global log / find
    // -----------------------------------------------------------------

    #[test]
    fn log_walks_first_parents_newest_first() {
        let (dir, repo) = init_repo();
        write(&dir, "a.txt", "1");
        repo.add("a.txt").unwrap();
        repo.commit("first").unwrap();
        write(&dir, "a.txt", "2");
        repo.add("a.txt").unwrap();
        repo.commit("second").unwrap();

        let messages: Vec<String> = repo.log().unwrap().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["second", "first", "initial commit"]);
    }

    #[test]
    fn global_log_sees_commits_on_every_branch() {
        let (dir, repo) = init_repo();
        write(&dir, "a.txt", "a");
        repo.add("a.txt").unwrap();
        repo.commit("on main").unwrap();

        repo.branch("side").unwrap();
        repo.checkout_branch("side").unwrap();
        write(&dir, "b.txt", "b");
        repo.add("b.txt").unwrap();
        repo.commit("on side").unwrap();
        repo.checkout_branch("main").unwrap();

        let messages: Vec<String> = repo
            .global_log()
            .unwrap()
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert!(messages.contains(&"on main".to_string()));
        assert!(messages.contains(&"on side".to_string()));
        assert!(messages.contains(&"initial commit".to_string()));
    }

    #[test]
    fn find_returns_all_matches() {
        let (dir, repo) = init_repo();
        write(&dir, "a.txt", "1");
        repo.add("a.txt").unwrap();
        let first = repo.commit("same message").unwrap();
        write(&dir, "a.txt", "2");
        repo.add("a.txt").unwrap();
        let second = repo.commit("same message").unwrap();

        let mut found = repo.find("same message").unwrap();
        found.sort();
        let mut expected = vec![first, second];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn find_without_match_fails() {
        let (_dir, repo) = init_repo();
        let err = repo.find("nope").unwrap_err();
        assert!(matches!(err, RepoError::NoCommitWithMessage { .. }));
    }

    // -----------------------------------------------------------------
    // status
    // -----------------------------------------------------------------

    #[test]
    fn status_lists_branches_with_current() {
        let (_dir, repo) = init_repo();
        repo.branch("develop").unwrap();

        let status = repo.status().unwrap();
        assert_eq!(status.current_branch, "main");
        assert_eq!(status.branches, vec!["develop", "main"]);
    }

    #[test]
    fn status_classifies_staged_and_removed() {
        let (dir, repo) = init_repo();
        write(&dir, "tracked.txt", "t");
        repo.add("tracked.txt").unwrap();
        repo.commit("base").unwrap();

        write(&dir, "new.txt", "n");
        repo.add("new.txt").unwrap();
        repo.remove("tracked.txt").unwrap();

        let status = repo.status().unwrap();
        assert_eq!(status.staged, vec!["new.txt"]);
        assert_eq!(status.removed, vec!["tracked.txt"]);
    }

    #[test]
    fn status_spots_unstaged_modification_and_deletion() {
        let (dir, repo) = init_repo();
        write(&dir, "mod.txt", "original");
        write(&dir, "gone.txt", "present");
        repo.add("mod.txt").unwrap();
        repo.add("gone.txt").unwrap();
        repo.commit("base").unwrap();

        write(&dir, "mod.txt", "changed behind the stage's back");
        fs::remove_file(dir.path().join("gone.txt")).unwrap();

        let status = repo.status().unwrap();
        assert_eq!(status.modifications.len(), 2);
        let by_path: std::collections::HashMap<&str, ModificationKind> = status
            .modifications
            .iter()
            .map(|m| (m.path.as_str(), m.kind))
            .collect();
        assert_eq!(by_path["mod.txt"], ModificationKind::Modified);
        assert_eq!(by_path["gone.txt"], ModificationKind::Deleted);
    }

    #[test]
    fn status_lists_untracked_files() {
        let (dir, repo) = init_repo();
        write(&dir, "known.txt", "k");
        repo.add("known.txt").unwrap();
        write(&dir, "stray.txt", "s");

        let status = repo.status().unwrap();
        assert_eq!(status.untracked, vec!["stray.txt"]);
    }

    #[test]
    fn removed_then_recreated_file_is_untracked() {
        let (dir, repo) = init_repo();
        write(&dir, "back.txt", "v1");
        repo.add("back.txt").unwrap();
        repo.commit("base").unwrap();

        repo.remove("back.txt").unwrap();
        write(&dir, "back.txt", "recreated");

        let status = repo.status().unwrap();
        assert!(status.untracked.contains(&"back.txt".to_string()));
    }

    // -----------------------------------------------------------------
    // checkout / reset
    // -----------------------------------------------------------------

    #[test]
    fn checkout_path_restores_committed_content() {
        let (dir, repo) = init_repo();
        write(&dir, "f.txt", "committed");
        repo.add("f.txt").unwrap();
        repo.commit("base").unwrap();

        write(&dir, "f.txt", "scribbled over");
        repo.checkout_path("f.txt").unwrap();
        assert_eq!(read(&dir, "f.txt"), "committed");
    }

    #[test]
    fn checkout_path_at_restores_an_older_version() {
        let (dir, repo) = init_repo();
        write(&dir, "f.txt", "v1");
        repo.add("f.txt").unwrap();
        let old = repo.commit("v1").unwrap();
        write(&dir, "f.txt", "v2");
        repo.add("f.txt").unwrap();
        repo.commit("v2").unwrap();

        repo.checkout_path_at(old, "f.txt").unwrap();
        assert_eq!(read(&dir, "f.txt"), "v1");
    }

    #[test]
    fn checkout_path_unknown_in_commit_fails() {
        let (_dir, repo) = init_repo();
        let err = repo.checkout_path("never.txt").unwrap_err();
        assert!(matches!(err, RepoError::PathNotInCommit { .. }));
    }

    #[test]
    fn checkout_path_at_unknown_commit_fails() {
        let (_dir, repo) = init_repo();
        let err = repo
            .checkout_path_at(ObjectId::from_bytes(b"bogus"), "f.txt")
            .unwrap_err();
        assert!(matches!(err, RepoError::CommitNotFound { .. }));
    }

    #[test]
    fn checkout_branch_swaps_working_tree() {
        let (dir, repo) = init_repo();
        write(&dir, "shared.txt", "base");
        repo.add("shared.txt").unwrap();
        repo.commit("base").unwrap();

        repo.branch("side").unwrap();
        repo.checkout_branch("side").unwrap();
        write(&dir, "side-only.txt", "s");
        write(&dir, "shared.txt", "side version");
        repo.add("side-only.txt").unwrap();
        repo.add("shared.txt").unwrap();
        repo.commit("side work").unwrap();

        repo.checkout_branch("main").unwrap();
        assert_eq!(read(&dir, "shared.txt"), "base");
        assert!(!exists(&dir, "side-only.txt"));

        repo.checkout_branch("side").unwrap();
        assert_eq!(read(&dir, "shared.txt"), "side version");
        assert!(exists(&dir, "side-only.txt"));
    }

    #[test]
    fn checkout_current_branch_fails() {
        let (_dir, repo) = init_repo();
        let err = repo.checkout_branch("main").unwrap_err();
        assert!(matches!(err, RepoError::CannotActOnCurrentBranch { .. }));
    }

    #[test]
    fn checkout_missing_branch_fails() {
        let (_dir, repo) = init_repo();
        let err = repo.checkout_branch("ghost").unwrap_err();
        assert!(matches!(err, RepoError::BranchNotFound { .. }));
    }

    #[test]
    fn checkout_refuses_to_overwrite_untracked_file() {
        let (dir, repo) = init_repo();
        repo.branch("side").unwrap();
        repo.checkout_branch("side").unwrap();
        write(&dir, "f.txt", "side version");
        repo.add("f.txt").unwrap();
        repo.commit("side adds f").unwrap();

        repo.checkout_branch("main").unwrap();
        write(&dir, "f.txt", "precious untracked content");

        let err = repo.checkout_branch("side").unwrap_err();
        assert!(matches!(err, RepoError::WouldOverwriteUntracked { .. }));
        // The guard fires before any write: the file is untouched and HEAD
        // still names main.
        assert_eq!(read(&dir, "f.txt"), "precious untracked content");
        assert_eq!(repo.status().unwrap().current_branch, "main");
    }

    #[test]
    fn reset_moves_branch_and_restores_tree() {
        let (dir, repo) = init_repo();
        write(&dir, "f.txt", "v1");
        repo.add("f.txt").unwrap();
        let old = repo.commit("v1").unwrap();
        write(&dir, "f.txt", "v2");
        write(&dir, "extra.txt", "e");
        repo.add("f.txt").unwrap();
        repo.add("extra.txt").unwrap();
        repo.commit("v2").unwrap();

        repo.reset(old).unwrap();
        assert_eq!(read(&dir, "f.txt"), "v1");
        assert!(!exists(&dir, "extra.txt"));
        assert_eq!(repo.current_branch().unwrap().target, old);
        assert!(repo.status().unwrap().staged.is_empty());
    }

    // -----------------------------------------------------------------
    // branch management
    // -----------------------------------------------------------------

    #[test]
    fn branch_duplicate_fails() {
        let (_dir, repo) = init_repo();
        repo.branch("twice").unwrap();
        let err = repo.branch("twice").unwrap_err();
        assert!(matches!(err, RepoError::BranchAlreadyExists { .. }));
    }

    #[test]
    fn new_branch_points_at_current_commit() {
        let (dir, repo) = init_repo();
        write(&dir, "a.txt", "a");
        repo.add("a.txt").unwrap();
        let tip = repo.commit("tip").unwrap();

        repo.branch("here").unwrap();
        let branches = repo.branches().unwrap();
        let here = branches.iter().find(|b| b.name == "here").unwrap();
        assert_eq!(here.target, tip);
    }

    #[test]
    fn remove_branch_errors() {
        let (_dir, repo) = init_repo();
        let err = repo.remove_branch("ghost").unwrap_err();
        assert!(matches!(err, RepoError::BranchNotFound { .. }));

        let err = repo.remove_branch("main").unwrap_err();
        assert!(matches!(err, RepoError::CannotActOnCurrentBranch { .. }));

        repo.branch("doomed").unwrap();
        repo.remove_branch("doomed").unwrap();
        assert!(repo.branches().unwrap().iter().all(|b| b.name != "doomed"));
    }

    // -----------------------------------------------------------------
    // merge
    // -----------------------------------------------------------------

    /// Base repo: one commit on main tracking f.txt and g.txt, plus a
    /// branch `other` forked at that commit.
    fn forked_repo() -> (TempDir, Repository) {
        let (dir, repo) = init_repo();
        write(&dir, "f.txt", "f base\n");
        write(&dir, "g.txt", "g base\n");
        repo.add("f.txt").unwrap();
        repo.add("g.txt").unwrap();
        repo.commit("base").unwrap();
        repo.branch("other").unwrap();
        (dir, repo)
    }

    #[test]
    fn merge_with_dirty_stage_fails() {
        let (dir, repo) = forked_repo();
        write(&dir, "new.txt", "pending");
        repo.add("new.txt").unwrap();
        let err = repo.merge("other").unwrap_err();
        assert!(matches!(err, RepoError::UncommittedChanges));
    }

    #[test]
    fn merge_missing_branch_fails() {
        let (_dir, repo) = forked_repo();
        let err = repo.merge("ghost").unwrap_err();
        assert!(matches!(err, RepoError::BranchNotFound { .. }));
    }

    #[test]
    fn merge_with_self_fails() {
        let (_dir, repo) = forked_repo();
        let err = repo.merge("main").unwrap_err();
        assert!(matches!(err, RepoError::CannotActOnCurrentBranch { .. }));
    }

    #[test]
    fn merge_of_an_ancestor_is_a_noop() {
        let (dir, repo) = forked_repo();
        // main moves ahead; other stays at the fork point.
        write(&dir, "f.txt", "f newer\n");
        repo.add("f.txt").unwrap();
        repo.commit("advance main").unwrap();

        let report = repo.merge("other").unwrap();
        assert_eq!(report, MergeReport::AlreadyMerged);
        // No commit created, branch untouched.
        assert_eq!(repo.log().unwrap()[0].message, "advance main");
    }

    #[test]
    fn merge_fast_forwards_when_current_is_behind() {
        let (dir, repo) = forked_repo();
        repo.checkout_branch("other").unwrap();
        write(&dir, "f.txt", "f ahead\n");
        repo.add("f.txt").unwrap();
        let ahead = repo.commit("advance other").unwrap();
        repo.checkout_branch("main").unwrap();
        assert_eq!(read(&dir, "f.txt"), "f base\n");

        let report = repo.merge("other").unwrap();
        assert_eq!(report, MergeReport::FastForward { target: ahead });

        // The branch pointer moved without a new commit, HEAD still names
        // main, and the working tree caught up.
        assert_eq!(repo.current_branch().unwrap().target, ahead);
        assert_eq!(repo.status().unwrap().current_branch, "main");
        assert_eq!(read(&dir, "f.txt"), "f ahead\n");
    }

    #[test]
    fn clean_merge_combines_both_sides() {
        let (dir, repo) = forked_repo();
        repo.checkout_branch("other").unwrap();
        write(&dir, "g.txt", "g theirs\n");
        repo.add("g.txt").unwrap();
        let other_tip = repo.commit("their g").unwrap();

        repo.checkout_branch("main").unwrap();
        write(&dir, "f.txt", "f ours\n");
        repo.add("f.txt").unwrap();
        let our_tip = repo.commit("our f").unwrap();

        let report = repo.merge("other").unwrap();
        let MergeReport::Merged { commit, conflicts } = report else {
            panic!("expected a merge commit");
        };
        assert!(conflicts.is_empty());

        // Exactly two parents, [current, other] in that order.
        let merged = repo.commit_by_id(commit).unwrap();
        assert_eq!(merged.parents, vec![our_tip, other_tip]);
        assert_eq!(merged.message, "Merged other into main.");

        // Both sides' changes landed on disk and in the tree.
        assert_eq!(read(&dir, "f.txt"), "f ours\n");
        assert_eq!(read(&dir, "g.txt"), "g theirs\n");
        assert!(merged.tracked("f.txt").is_some());
        assert!(merged.tracked("g.txt").is_some());
    }

    #[test]
    fn merge_applies_other_sides_deletion() {
        let (dir, repo) = forked_repo();
        repo.checkout_branch("other").unwrap();
        repo.remove("g.txt").unwrap();
        repo.commit("drop g").unwrap();

        repo.checkout_branch("main").unwrap();
        write(&dir, "f.txt", "f ours\n");
        repo.add("f.txt").unwrap();
        repo.commit("our f").unwrap();

        let report = repo.merge("other").unwrap();
        let MergeReport::Merged { commit, conflicts } = report else {
            panic!("expected a merge commit");
        };
        assert!(conflicts.is_empty());
        assert!(!exists(&dir, "g.txt"));
        assert!(repo.commit_by_id(commit).unwrap().tracked("g.txt").is_none());
    }

    #[test]
    fn divergent_edits_produce_a_conflict_blob() {
        let (dir, repo) = forked_repo();
        repo.checkout_branch("other").unwrap();
        write(&dir, "f.txt", "b\n");
        repo.add("f.txt").unwrap();
        repo.commit("their f").unwrap();

        repo.checkout_branch("main").unwrap();
        write(&dir, "f.txt", "a\n");
        repo.add("f.txt").unwrap();
        repo.commit("our f").unwrap();

        let report = repo.merge("other").unwrap();
        assert!(report.had_conflicts());
        let MergeReport::Merged { commit, conflicts } = report else {
            panic!("expected a merge commit");
        };
        assert_eq!(conflicts, vec!["f.txt"]);

        let expected = "<<<<<<< current\na\n=======\nb\n>>>>>>>\n";
        assert_eq!(read(&dir, "f.txt"), expected);

        // The conflict blob is tracked as the path's new content.
        let merged = repo.commit_by_id(commit).unwrap();
        let blob = load_blob(&repo.objects, merged.tracked("f.txt").unwrap()).unwrap();
        assert_eq!(blob.data, expected.as_bytes());
    }

    #[test]
    fn modify_delete_conflict_has_an_empty_section() {
        let (dir, repo) = forked_repo();
        repo.checkout_branch("other").unwrap();
        repo.remove("f.txt").unwrap();
        repo.commit("drop f").unwrap();

        repo.checkout_branch("main").unwrap();
        write(&dir, "f.txt", "kept and edited\n");
        repo.add("f.txt").unwrap();
        repo.commit("edit f").unwrap();

        let report = repo.merge("other").unwrap();
        assert!(report.had_conflicts());
        assert_eq!(
            read(&dir, "f.txt"),
            "<<<<<<< current\nkept and edited\n=======\n>>>>>>>\n"
        );
    }

    #[test]
    fn merge_aborts_when_untracked_file_is_in_the_way() {
        let (dir, repo) = forked_repo();
        repo.checkout_branch("other").unwrap();
        write(&dir, "new.txt", "their new file\n");
        repo.add("new.txt").unwrap();
        repo.commit("their new").unwrap();

        repo.checkout_branch("main").unwrap();
        write(&dir, "f.txt", "f ours\n");
        repo.add("f.txt").unwrap();
        repo.commit("our f").unwrap();
        write(&dir, "new.txt", "untracked local content\n");

        let err = repo.merge("other").unwrap_err();
        assert!(matches!(err, RepoError::WouldOverwriteUntracked { .. }));
        // Aborted before any side effect.
        assert_eq!(read(&dir, "new.txt"), "untracked local content\n");
        assert_eq!(repo.log().unwrap()[0].message, "our f");
    }

    #[test]
    fn merge_commit_is_invisible_to_first_parent_log_of_the_other_side() {
        let (dir, repo) = forked_repo();
        repo.checkout_branch("other").unwrap();
        write(&dir, "g.txt", "g theirs\n");
        repo.add("g.txt").unwrap();
        repo.commit("their g").unwrap();

        repo.checkout_branch("main").unwrap();
        write(&dir, "f.txt", "f ours\n");
        repo.add("f.txt").unwrap();
        repo.commit("our f").unwrap();
        repo.merge("other").unwrap();

        let messages: Vec<String> = repo.log().unwrap().into_iter().map(|e| e.message).collect();
        // First-parent walk: merge, our side, base, root. "their g" is on
        // the second-parent side and must not appear.
        assert_eq!(
            messages,
            vec!["Merged other into main.", "our f", "base", "initial commit"]
        );
    }
}

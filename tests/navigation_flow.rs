//! End-to-end navigation through the app over on-disk repositories.

mod common;

use common::{commit, linear_history, press, short, TestRepos, SETTLE};
use crossterm::event::KeyCode;
use gitdeck::screens::UNSUPPORTED_FILE_VIEW;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

fn screen_text(app: &mut gitdeck::App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    let mut drawn = Ok(());
    terminal.draw(|frame| drawn = app.draw(frame)).unwrap();
    drawn.unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn test_two_repository_list() {
    let repos = TestRepos::new();
    repos.init(
        "conquest",
        Some("https://github.com/creationix/conquest.git"),
        "Lords of Conquest remake",
    );
    repos.init("js-git", Some("https://github.com/creationix/js-git.git"), "");

    let mut app = repos.app();
    assert_eq!(app.depth(), 1);
    assert_eq!(app.top_title(), "Git Repositories");

    let text = screen_text(&mut app);
    assert!(text.contains("Git Repositories (2)"));
    assert!(text.contains("conquest  Lords of Conquest remake"));
    assert!(text.contains("js-git"));
}

#[test]
fn test_browse_history_commit_and_tree() {
    let repos = TestRepos::new();
    let repo = repos.init("demo", None, "");
    let [_, _, c] = linear_history(&repo);

    let mut app = repos.app();
    press(&mut app, KeyCode::Enter);
    app.settle(SETTLE).unwrap();
    assert_eq!(app.top_title(), "History of demo");
    assert_eq!(app.depth(), 2);

    let text = screen_text(&mut app);
    assert!(text.contains("Document the demo"));
    assert!(text.contains("Initial commit"));
    assert!(!text.contains("Load More..."));

    // Newest commit first; opening it needs no backend round trip
    press(&mut app, KeyCode::Enter);
    assert!(!app.has_pending_requests());
    assert_eq!(app.top_title(), format!("Commit {}", short(c)));

    // First link is the tree
    press(&mut app, KeyCode::Enter);
    app.settle(SETTLE).unwrap();
    assert_eq!(app.depth(), 4);
    let text = screen_text(&mut app);
    assert!(text.contains("README.md"));
    assert!(text.contains("src/"));

    press(&mut app, KeyCode::Enter);
    assert_eq!(
        app.toasts().current().map(|t| t.message.as_str()),
        Some(UNSUPPORTED_FILE_VIEW)
    );
    assert_eq!(app.depth(), 4);

    for depth in [3, 2, 1] {
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.depth(), depth);
    }
    // Back at the root nothing happens
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.depth(), 1);
    assert_eq!(app.top_title(), "Git Repositories");
}

#[test]
fn test_parent_navigation_replaces_detail() {
    let repos = TestRepos::new();
    let repo = repos.init("demo", None, "");
    let [a, b, c] = linear_history(&repo);

    let mut app = repos.app();
    press(&mut app, KeyCode::Enter);
    app.settle(SETTLE).unwrap();
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.top_title(), format!("Commit {}", short(c)));

    for expected in [b, a] {
        // Second link is the (only) parent
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        app.settle(SETTLE).unwrap();
        assert_eq!(app.depth(), 3);
        assert_eq!(app.top_title(), format!("Commit {}", short(expected)));
    }

    // One back returns to the history that opened C
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.depth(), 2);
    assert_eq!(app.top_title(), "History of demo");
}

#[test]
fn test_history_pages_in_batches_of_nine() {
    let repos = TestRepos::new();
    let repo = repos.init("long", None, "");
    let mut parent = None;
    for i in 0..20 {
        let content = format!("version {}\n", i);
        let parents: Vec<_> = parent.into_iter().collect();
        parent = Some(commit(
            &repo,
            &[("VERSION", content.as_str())],
            &format!("Release {}", i),
            1_000 + i64::from(i),
            &parents,
        ));
    }

    let mut app = repos.app();
    press(&mut app, KeyCode::Enter);
    app.settle(SETTLE).unwrap();

    let text = screen_text(&mut app);
    assert!(text.contains("(9 commits)"));
    assert!(text.contains("Load More..."));

    // ceil(20 / 9) - 1 = 2 activations show everything
    for shown in [18, 20] {
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Enter);
        let text = screen_text(&mut app);
        assert!(text.contains(&format!("({} commits)", shown)));
    }
    assert!(!screen_text(&mut app).contains("Load More..."));
}

#[test]
fn test_result_for_popped_screen_is_ignored() {
    let repos = TestRepos::new();
    let repo = repos.init("demo", None, "");
    linear_history(&repo);

    let mut app = repos.app();
    press(&mut app, KeyCode::Enter);
    // Leaving is impossible at the root, so the history still arrives
    press(&mut app, KeyCode::Esc);
    app.settle(SETTLE).unwrap();
    assert_eq!(app.top_title(), "History of demo");

    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Esc);
    app.settle(SETTLE).unwrap();
    assert_eq!(app.depth(), 2);
    assert_eq!(app.top_title(), "History of demo");
}

#[test]
fn test_refresh_picks_up_new_repositories() {
    let repos = TestRepos::new();
    repos.init("first", None, "");

    let mut app = repos.app();
    assert!(screen_text(&mut app).contains("Git Repositories (1)"));

    repos.init("second", None, "");
    press(&mut app, KeyCode::Char('r'));
    app.settle(SETTLE).unwrap();
    assert_eq!(app.depth(), 1);
    assert!(screen_text(&mut app).contains("Git Repositories (2)"));
}

#[test]
fn test_clone_form_refuses_empty_path() {
    let repos = TestRepos::new();
    let mut app = repos.app();

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.top_title(), "Clone Repository");

    // Move to the path field and erase it
    press(&mut app, KeyCode::Tab);
    for _ in 0.."/creationix/conquest.git".len() {
        press(&mut app, KeyCode::Backspace);
    }
    press(&mut app, KeyCode::Enter);

    assert!(!app.has_pending_requests());
    assert_eq!(app.top_title(), "Clone Repository");
    assert!(screen_text(&mut app).contains("Path is required"));
}

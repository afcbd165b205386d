//! Supervisor integration: planned instances → real child processes.
#![cfg(unix)]

use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use forewoman_core::{prepare, RunOptions};
use forewoman_supervisor::{InstanceExit, Multiplexer, Supervisor};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct Console(Arc<Mutex<Vec<u8>>>);

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("lock").write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Console {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().expect("lock").clone()).expect("utf8")
    }
}

#[tokio::test]
async fn one_type_with_concurrency_three_spawns_three_children() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("Procfile"), "web: printenv PORT\n").expect("write");

    let options = RunOptions {
        concurrency: Some("web=3".into()),
        ..RunOptions::default()
    };
    let plan = prepare(&options, dir.path()).expect("prepare");

    let console = Console::default();
    let mut supervisor = Supervisor::new(plan.working_dir.clone(), Multiplexer::plain(console.clone()));
    for spec in plan.instances {
        supervisor.spawn(spec);
    }
    assert_eq!(supervisor.running(), 3);

    let ports: HashSet<u16> = ["web-0", "web-1", "web-2"]
        .iter()
        .filter_map(|name| supervisor.get(name).map(|p| p.port))
        .collect();
    assert_eq!(ports, HashSet::from([5000, 5001, 5002]));

    let summary = supervisor.run(std::future::pending()).await.expect("run");
    assert_eq!(summary.exits.len(), 3);
    assert!(summary.exits.iter().all(|(_, exit)| *exit == InstanceExit::Code(0)));

    let text = console.text();
    for (name, port) in [("web-0", 5000), ("web-1", 5001), ("web-2", 5002)] {
        assert!(text.contains(&format!("[{name}] {port}\n")), "{text}");
        assert!(text.contains(&format!("[{name}] exited with code 0\n")), "{text}");
    }
}

#[tokio::test]
async fn exit_of_one_instance_leaves_others_running() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("Procfile"), "quick: true\nslow: sleep 30\n").expect("write");
    let plan = prepare(&RunOptions::default(), dir.path()).expect("prepare");

    let console = Console::default();
    let mut supervisor = Supervisor::new(plan.working_dir.clone(), Multiplexer::plain(console.clone()));
    for spec in plan.instances {
        supervisor.spawn(spec);
    }

    // Shut down only once `quick` has been reported, proving `slow` outlived it.
    let watched = console.clone();
    let shutdown = async move {
        while !watched.text().contains("[quick-0] exited with code 0") {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
    };
    let summary = supervisor.run(shutdown).await.expect("run");

    let order: Vec<_> = summary.exits.iter().map(|(name, _)| name.0.as_str()).collect();
    assert_eq!(order, ["quick-0", "slow-0"]);
    assert_eq!(summary.exits[1].1, InstanceExit::Signal(9));
    assert_eq!(
        console.text().matches("[quick-0] exited with code").count(),
        1
    );
}

#[tokio::test]
async fn exit_is_reported_while_background_child_holds_the_pipe() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("bg.sh"), "sleep 5 &\necho started\n").expect("write");
    std::fs::write(dir.path().join("Procfile"), "web: sh bg.sh\n").expect("write");
    let plan = prepare(&RunOptions::default(), dir.path()).expect("prepare");

    let console = Console::default();
    let mut supervisor = Supervisor::new(plan.working_dir.clone(), Multiplexer::plain(console.clone()));
    for spec in plan.instances {
        supervisor.spawn(spec);
    }

    let started = std::time::Instant::now();
    let summary = tokio::time::timeout(
        std::time::Duration::from_secs(3),
        supervisor.run(std::future::pending()),
    )
    .await
    .expect("exit reported before the background sleep finished")
    .expect("run");

    assert!(started.elapsed() < std::time::Duration::from_secs(3));
    assert_eq!(summary.exits.len(), 1);
    assert_eq!(summary.exits[0].1, InstanceExit::Code(0));
    let text = console.text();
    assert!(text.contains("[web-0] started\n"), "{text}");
    assert!(text.contains("[web-0] exited with code 0\n"), "{text}");
}

use std::collections::HashMap;
use std::time::Duration;

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        pub(crate) use web_time::Instant;
    } else {
        pub(crate) use std::time::Instant;
    }
}

#[derive(Debug, Default)]
struct InnerTimer {
    start: Option<Instant>,
    elapsed: Duration,
    children: HashMap<&'static str, InnerTimer>,
}

impl InnerTimer {
    fn reset(&mut self) {
        self.start = None;
        self.elapsed = Duration::ZERO;
        self.children.clear();
    }

    fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    fn stop(&mut self) {
        if let Some(instant) = self.start.take() {
            self.elapsed += instant.elapsed();
        }
    }
}

/// A collection of named, nestable phase timers.
#[derive(Default, Debug)]
pub(crate) struct Timers {
    stack: Vec<&'static str>,
    roots: HashMap<&'static str, InnerTimer>,
}

impl Timers {
    fn active_children(&mut self) -> &mut HashMap<&'static str, InnerTimer> {
        let mut children = &mut self.roots;
        for key in self.stack.iter() {
            // every key on the stack was inserted by start_as_current
            children = &mut children.entry(*key).or_default().children;
        }
        children
    }

    /// clear a top level timer and all of its children
    pub fn reset_timer(&mut self, key: &'static str) {
        self.roots.entry(key).or_default().reset();
    }

    /// start a timer as a child of the currently running one
    pub fn start_as_current(&mut self, key: &'static str) {
        self.active_children().entry(key).or_default().start();
        self.stack.push(key);
    }

    /// stop the most recently started timer
    pub fn stop_current(&mut self) {
        if let Some(key) = self.stack.pop() {
            if let Some(t) = self.active_children().get_mut(key) {
                t.stop();
            }
        }
    }

    /// Accumulated time of the timer at `path`, e.g. `&["solve", "polish"]`.
    /// Unknown paths report zero.
    pub fn elapsed(&self, path: &[&'static str]) -> Duration {
        let mut children = &self.roots;
        let mut found = None;
        for key in path {
            match children.get(key) {
                Some(t) => {
                    found = Some(t);
                    children = &t.children;
                }
                None => return Duration::ZERO,
            }
        }
        found.map_or(Duration::ZERO, |t| t.elapsed)
    }

    /// elapsed time in seconds of the timer at `path`
    pub fn elapsed_secs(&self, path: &[&'static str]) -> f64 {
        self.elapsed(path).as_secs_f64()
    }
}

// Evaluates the trailing statements with the timer `$key` running and
// yields the value of the last expression.  Early returns inside the
// block would leave the timer running, so callers apply `?` to the
// result outside of the macro.
macro_rules! timeit {
    ($timer:expr => $key:literal; $($tt:tt)+) => {{
        $timer.start_as_current($key);
        let out = { $($tt)+ };
        $timer.stop_current();
        out
    }};
}
pub(crate) use timeit;

#[test]
fn test_timers_nesting() {
    let mut timers = Timers::default();

    let v = timeit! {timers => "solve";
        let inner = timeit!{timers => "polish"; 3 };
        inner + 1
    };
    assert_eq!(v, 4);
    assert!(timers.stack.is_empty());

    let total = timers.elapsed(&["solve"]);
    let polish = timers.elapsed(&["solve", "polish"]);
    assert!(polish <= total);
    assert_eq!(timers.elapsed(&["polish"]), Duration::ZERO);
    assert_eq!(timers.elapsed(&["missing", "path"]), Duration::ZERO);

    timers.reset_timer("solve");
    assert_eq!(timers.elapsed(&["solve"]), Duration::ZERO);
    assert_eq!(timers.elapsed(&["solve", "polish"]), Duration::ZERO);
}

//! Logger printing messages that pass the level threshold to stderr.

use crate::*;

use std::cell::Cell;
use std::fmt::Debug;
use std::rc::Rc;



// ==============
// === Logger ===
// ==============

/// Default Logger implementation.
#[derive(Clone,Debug)]
pub struct Logger {
    /// Dotted path of the component owning this logger.
    pub path : Rc<str>,
    depth    : Rc<Cell<usize>>,
}

impl Logger {
    fn format<M:LogMsg>(&self, level:Level, msg:M) -> String {
        let indent = "  ".repeat(self.depth.get());
        msg.with_log_msg(|s| format!("{}[{}] [{}] {}",indent,level.tag(),self.path,s))
    }

    fn emit<M:LogMsg>(&self, level:Level, msg:M) {
        if is_enabled(level) {
            eprintln!("{}",self.format(level,msg));
        }
    }
}

impl LoggerApi for Logger {
    fn new<T:AsRef<str>>(path:T) -> Self {
        let path  = Rc::from(path.as_ref());
        let depth = Rc::new(Cell::new(0));
        Self {path,depth}
    }

    fn sub<T:AsRef<str>>(&self, path:T) -> Self {
        if self.path.is_empty() { Self::new(path) } else {
            let path  = Rc::from(format!("{}.{}",self.path,path.as_ref()).as_str());
            let depth = self.depth.clone();
            Self {path,depth}
        }
    }

    fn group<M:LogMsg,T,F:FnOnce() -> T>(&self, msg:M, f:F) -> T {
        self.group_begin(msg);
        let out = f();
        self.group_end();
        out
    }

    fn trace<M:LogMsg>(&self, msg:M) {
        self.emit(Level::Trace,msg)
    }

    fn debug<M:LogMsg>(&self, msg:M) {
        self.emit(Level::Debug,msg)
    }

    fn info<M:LogMsg>(&self, msg:M) {
        self.emit(Level::Info,msg)
    }

    fn warning<M:LogMsg>(&self, msg:M) {
        self.emit(Level::Warning,msg)
    }

    fn error<M:LogMsg>(&self, msg:M) {
        self.emit(Level::Error,msg)
    }

    fn group_begin<M:LogMsg>(&self, msg:M) {
        if is_enabled(Level::Debug) {
            eprintln!(">>> {}",self.format(Level::Debug,msg));
        }
        self.depth.set(self.depth.get() + 1);
    }

    fn group_end(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("")
    }
}

impl From<&Logger> for Logger {
    fn from(logger:&Logger) -> Self {
        logger.clone()
    }
}



// =============
// === Tests ===
// =============

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_logger_paths() {
        let root = Logger::new("pane");
        let png  = root.sub("PNG");
        let leaf = png.sub("binding");
        assert_eq!(&*png.path , "pane.PNG");
        assert_eq!(&*leaf.path, "pane.PNG.binding");
        assert_eq!(&*Logger::new("").sub("registry").path, "registry");
    }

    #[test]
    fn groups_nest_and_unwind() {
        let logger = Logger::new("pane");
        let sub    = logger.sub("child");
        let out    = logger.group("outer", || {
            assert_eq!(sub.depth.get(), 1);
            sub.group("inner", || sub.depth.get())
        });
        assert_eq!(out, 2);
        assert_eq!(logger.depth.get(), 0);
    }
}

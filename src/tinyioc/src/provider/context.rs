use crate::key::TypeKey;

/// Information about one request passed down through nested resolutions.
#[derive(Clone)]
pub struct CallContext<'a> {
    trace: InjectionTrace<'a>,
}

impl<'a> CallContext<'a> {
    pub fn new(key: TypeKey) -> Self {
        Self {
            trace: InjectionTrace::new(key),
        }
    }

    pub fn append<'b>(&'b self, key: TypeKey) -> CallContext<'b> {
        CallContext {
            trace: self.trace.append(key),
        }
    }

    /// The key currently being resolved.
    pub fn key(&self) -> TypeKey {
        self.trace.key()
    }

    pub fn trace(&self) -> &InjectionTrace<'_> {
        &self.trace
    }
}

/// A stack of keys, from the key currently being resolved back to the
/// top-level request.
#[derive(Clone)]
pub struct InjectionTrace<'a> {
    key: TypeKey,
    previous: Option<&'a InjectionTrace<'a>>,
}

impl<'a> InjectionTrace<'a> {
    pub fn new(key: TypeKey) -> Self {
        Self {
            key,
            previous: None,
        }
    }

    pub fn append<'b>(&'b self, key: TypeKey) -> InjectionTrace<'b> {
        InjectionTrace {
            key,
            previous: Some(self),
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn previous(&self) -> Option<&InjectionTrace<'a>> {
        self.previous
    }

    pub fn previous_exist_key(&self, key: TypeKey) -> bool {
        let mut this = self;
        while let Some(previous) = this.previous() {
            if previous.key() == key {
                return true;
            }
            this = previous;
        }
        false
    }

    /// Number of keys in the trace, including the current one.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut this = self;
        while let Some(previous) = this.previous() {
            depth += 1;
            this = previous;
        }
        depth
    }
}

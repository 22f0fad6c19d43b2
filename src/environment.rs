use crate::error::Error;
use crate::token::Token;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Environments are shared, not owned, by whoever is executing in them: a
/// closure keeps its defining frame alive long after the block that created
/// it has finished.
pub type SharedEnvironment = Rc<RefCell<Environment>>;

/// A single scope frame: a name-to-value map plus a pointer to the
/// enclosing frame. The innermost frame is the head of the chain; the
/// global frame is the only one with no parent.
pub struct Environment {
    values: HashMap<String, Object>,
    enclosing: Option<SharedEnvironment>,
}

impl Environment {
    /// The global scope's frame.
    pub fn new() -> SharedEnvironment {
        Rc::new(RefCell::new(Self {
            values: HashMap::new(),
            enclosing: None,
        }))
    }

    /// A local frame nested inside the given outer one.
    pub fn new_enclosing(enclosing: &SharedEnvironment) -> SharedEnvironment {
        Rc::new(RefCell::new(Self {
            values: HashMap::new(),
            enclosing: Some(Rc::clone(enclosing)),
        }))
    }

    /// A new variable always lands in the innermost frame, silently
    /// replacing any previous binding of the same name there.
    pub fn define(&mut self, name: String, value: Object) {
        self.values.insert(name, value);
    }

    /// Looks the name up in the nearest enclosing frame that binds it.
    pub fn get(&self, name: &Token) -> Result<Object, Error> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(outer) => outer.borrow().get(name),
            None => Err(Error::RuntimeError(
                name.clone(),
                format!("Undefined variable '{}'.", name.lexeme),
            )),
        }
    }

    /// The difference from `define` is that assignment may not create a
    /// binding: the name must already exist in some enclosing frame.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), Error> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        match &self.enclosing {
            Some(outer) => outer.borrow_mut().assign(name, value),
            None => Err(Error::RuntimeError(
                name.clone(),
                format!("Undefined variable '{}'.", name.lexeme),
            )),
        }
    }

    /// Walks exactly `distance` parent links and reads `name` there, with
    /// no further search. `None` means the resolver and the evaluator
    /// disagree about the shape of the environment chain, which is a bug in
    /// the interpreter rather than in the user's program; the caller turns
    /// it into an internal error.
    pub fn get_at(&self, distance: usize, name: &str) -> Option<Object> {
        if distance == 0 {
            return self.values.get(name).cloned();
        }
        match &self.enclosing {
            Some(outer) => outer.borrow().get_at(distance - 1, name),
            None => None,
        }
    }

    /// The assignment analogue of `get_at`: writes into the frame exactly
    /// `distance` links up, failing if the binding is absent there.
    pub fn assign_at(&mut self, distance: usize, name: &str, value: Object) -> Option<()> {
        if distance == 0 {
            if !self.values.contains_key(name) {
                return None;
            }
            self.values.insert(name.to_string(), value);
            return Some(());
        }
        match &self.enclosing {
            Some(outer) => outer.borrow_mut().assign_at(distance - 1, name, value),
            None => None,
        }
    }
}

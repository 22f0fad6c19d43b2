use crate::error::Error;
use crate::token::Token;
use crate::value::class::Class;
use crate::value::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A live object: its class plus its own field map. Fields come and go
/// freely at runtime; methods live on the class.
pub struct Instance {
    class: Rc<Class>,
    fields: HashMap<String, Object>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: HashMap::new(),
        }
    }

    /// Property access: fields shadow methods, and a method reached this
    /// way comes back bound to this instance. An associated function
    /// rather than a method because binding needs the `Rc` handle, not
    /// just the borrowed contents.
    pub fn get(instance: &Rc<RefCell<Instance>>, name: &Token) -> Result<Object, Error> {
        if let Some(value) = instance.borrow().fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        let method = instance.borrow().class.find_method(&name.lexeme);
        if let Some(method) = method {
            return Ok(Object::Function(method.bind(instance)));
        }

        // Reading a missing property is an error rather than nil; silent
        // nil masks more bugs than it forgives.
        Err(Error::RuntimeError(
            name.clone(),
            format!("Undefined property '{}'.", name.lexeme),
        ))
    }

    /// Setting a property never fails: it creates the field if needed.
    pub fn set(&mut self, name: &Token, value: Object) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance", self.class.name)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Fields may refer back to the instance, so the debug form stays
        // shallow.
        write!(f, "{} instance", self.class.name)
    }
}

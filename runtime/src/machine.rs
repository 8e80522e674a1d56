//! Register machine
//!
//! Named registers, a stack that keeps a separate LIFO per register name,
//! and a program counter that `execute` drains one instruction at a time.
//! Nothing compiles to this machine yet; instructions are inert and only
//! counted and traced.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use schemer_core::{Error, Result, Symbol, Value};

pub const PC: &str = "pc";
pub const FLAG: &str = "flag";

// ============================================================================
// Instructions and Registers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub label: Option<String>,
    pub text: String,
}

impl Instruction {
    pub fn new(text: impl Into<String>) -> Self {
        Instruction {
            label: None,
            text: text.into(),
        }
    }

    /// An instruction that shows up in the trace under `label`
    pub fn labeled(label: impl Into<String>, text: impl Into<String>) -> Self {
        Instruction {
            label: Some(label.into()),
            text: text.into(),
        }
    }
}

/// What a register holds. The machine does not interpret it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Contents {
    #[default]
    Empty,
    Value(Value),
    Instructions(VecDeque<Instruction>),
}

#[derive(Debug, Clone)]
pub struct Register {
    name: Symbol,
    contents: Contents,
}

impl Register {
    pub fn new(name: Symbol) -> Self {
        Register {
            name,
            contents: Contents::Empty,
        }
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    pub fn set_contents(&mut self, contents: Contents) {
        self.contents = contents;
    }
}

// ============================================================================
// Stack
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackStats {
    pub pushes: u64,
    pub max_depth: usize,
}

/// Saved register contents, one LIFO per register name.
#[derive(Debug, Default)]
pub struct Stack {
    saved: FxHashMap<Symbol, Vec<Contents>>,
    stats: StackStats,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a copy of the register's contents on that register's stack.
    pub fn push(&mut self, register: &Register) {
        self.stats.pushes += 1;
        let slot = self.saved.entry(register.name).or_default();
        slot.push(register.contents.clone());
        self.stats.max_depth = self.stats.max_depth.max(slot.len());
    }

    /// Restore the most recently saved contents into the register.
    pub fn pop(&mut self, register: &mut Register) -> Result<()> {
        let contents = self
            .saved
            .get_mut(&register.name)
            .and_then(Vec::pop)
            .ok_or_else(|| {
                Error::machine(format!("Empty stack for register {}", register.name))
            })?;
        register.contents = contents;
        Ok(())
    }

    pub fn depth(&self, name: Symbol) -> usize {
        self.saved.get(&name).map_or(0, Vec::len)
    }

    /// Drop every saved value. Statistics cover the machine's whole life and
    /// are kept.
    pub fn initialize(&mut self) {
        self.saved.clear();
    }

    pub fn statistics(&self) -> StackStats {
        self.stats
    }
}

// ============================================================================
// Machine
// ============================================================================

pub struct Machine {
    registers: FxHashMap<Symbol, Register>,
    stack: Stack,
    instruction_count: u64,
    tracing: bool,
    trace_log: Vec<String>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// A machine with only the `pc` and `flag` registers allocated
    pub fn new() -> Self {
        let mut machine = Machine {
            registers: FxHashMap::default(),
            stack: Stack::new(),
            instruction_count: 0,
            tracing: false,
            trace_log: Vec::new(),
        };
        machine.allocate_register(PC);
        machine.allocate_register(FLAG);
        machine
    }

    /// Allocate `name` if it does not exist yet.
    pub fn allocate_register(&mut self, name: &str) -> &mut Register {
        let sym = Symbol::intern(name);
        self.registers
            .entry(sym)
            .or_insert_with(|| Register::new(sym))
    }

    /// Look up a register, allocating it on first use.
    pub fn lookup_register(&mut self, name: &str) -> &mut Register {
        self.allocate_register(name)
    }

    pub fn register_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registers.keys().map(Symbol::resolve).collect();
        names.sort();
        names
    }

    pub fn get_register_contents(&mut self, name: &str) -> Contents {
        self.lookup_register(name).contents.clone()
    }

    pub fn set_register_contents(&mut self, name: &str, contents: Contents) {
        self.lookup_register(name).contents = contents;
    }

    /// Push `name`'s contents onto its stack
    pub fn save(&mut self, name: &str) {
        let sym = Symbol::intern(name);
        let register = self
            .registers
            .entry(sym)
            .or_insert_with(|| Register::new(sym));
        self.stack.push(register);
    }

    /// Pop `name`'s stack back into the register
    pub fn restore(&mut self, name: &str) -> Result<()> {
        let sym = Symbol::intern(name);
        let register = self
            .registers
            .entry(sym)
            .or_insert_with(|| Register::new(sym));
        self.stack.pop(register)
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    /// Load a program into the program counter
    pub fn install(&mut self, instructions: Vec<Instruction>) {
        self.set_register_contents(PC, Contents::Instructions(instructions.into()));
    }

    pub fn set_tracing(&mut self, on: bool) {
        self.tracing = on;
    }

    pub fn trace_log(&self) -> &[String] {
        &self.trace_log
    }

    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Consume instructions from the program counter until it is empty.
    pub fn execute(&mut self) -> Result<()> {
        loop {
            let pc = self.lookup_register(PC);
            let instruction = match &mut pc.contents {
                Contents::Empty => return Ok(()),
                Contents::Instructions(pending) => match pending.pop_front() {
                    Some(instruction) => instruction,
                    None => return Ok(()),
                },
                Contents::Value(value) => {
                    return Err(Error::machine(format!(
                        "pc holds {value}, not a sequence of instructions"
                    )));
                }
            };
            self.trace(&instruction);
            self.instruction_count += 1;
        }
    }

    fn trace(&mut self, instruction: &Instruction) {
        if !self.tracing {
            return;
        }
        if let Some(label) = &instruction.label {
            self.trace_log.push(format!("{label} >>> {}", instruction.text));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemer_core::ErrorKind;

    #[test]
    fn test_new_machine_has_pc_and_flag() {
        let machine = Machine::new();
        assert_eq!(machine.register_names(), vec!["flag", "pc"]);
    }

    #[test]
    fn test_registers_are_allocated_lazily_once() {
        let mut machine = Machine::new();
        machine.set_register_contents("val", Contents::Value(Value::Number(3.0)));
        machine.allocate_register("val");
        assert_eq!(
            machine.get_register_contents("val"),
            Contents::Value(Value::Number(3.0))
        );
    }

    #[test]
    fn test_stack_is_lifo_per_register() {
        let mut stack = Stack::new();
        let mut reg = Register::new(Symbol::intern("r"));
        reg.set_contents(Contents::Value(Value::Number(1.0)));
        stack.push(&reg);
        reg.set_contents(Contents::Value(Value::Number(2.0)));
        stack.push(&reg);
        reg.set_contents(Contents::Empty);

        stack.pop(&mut reg).unwrap();
        assert_eq!(reg.contents(), &Contents::Value(Value::Number(2.0)));
        stack.pop(&mut reg).unwrap();
        assert_eq!(reg.contents(), &Contents::Value(Value::Number(1.0)));
    }

    #[test]
    fn test_pop_empty_stack_fails() {
        let mut stack = Stack::new();
        let mut reg = Register::new(Symbol::intern("lonely"));
        let err = stack.pop(&mut reg).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Machine);
        assert!(err.message.contains("lonely"));
    }

    #[test]
    fn test_execute_drains_pc() {
        let mut machine = Machine::new();
        machine.install(vec![Instruction::new("a"), Instruction::new("b")]);
        machine.execute().unwrap();
        assert_eq!(machine.instruction_count(), 2);
        assert_eq!(
            machine.get_register_contents(PC),
            Contents::Instructions(VecDeque::new())
        );
    }
}

//! Virtual Machine Core
//!
//! Defines the BacVM structure and its dispatch loop. Each iteration looks
//! the current instruction up in the opcode table, consults the reading
//! stack, runs the handler and moves the program counter.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::bytecode::{Instruction, OpCode};
use crate::config::VmConfig;
use crate::error::{BacError, BacResult};
use crate::loader::version;
use crate::native::NativeRegistry;

use super::feed::{Completion, FeedingStack};
use super::memory::ScopeChain;
use super::reading::ReadingStack;
use super::stack::BufferStack;
use super::value::Variable;

/// Where the program counter goes after a handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Jump(usize),
    Exit,
}

/// Mutable state of a single run.
///
/// Natives receive this as their handle on the VM.
#[derive(Debug)]
pub struct ExecutionState {
    scopes: ScopeChain,
    buffer: BufferStack,
    feeding: FeedingStack,
    reading: ReadingStack,
}

impl ExecutionState {
    pub fn new(config: &VmConfig) -> Self {
        ExecutionState {
            scopes: ScopeChain::new(config.max_scope_depth),
            buffer: BufferStack::new(config.max_buffer_size),
            feeding: FeedingStack::new(),
            reading: ReadingStack::new(),
        }
    }

    pub fn scopes(&self) -> &ScopeChain {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeChain {
        &mut self.scopes
    }

    pub fn buffer(&self) -> &BufferStack {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut BufferStack {
        &mut self.buffer
    }

    pub fn reading(&self) -> &ReadingStack {
        &self.reading
    }

    pub fn feeding_depth(&self) -> usize {
        self.feeding.depth()
    }

    fn reset(&mut self) {
        self.scopes.reset();
        self.buffer.clear();
        self.feeding.clear();
        self.reading.clear();
    }

    /// Run the handler for `op`
    fn execute(
        &mut self,
        op: OpCode,
        argument: &str,
        natives: &NativeRegistry,
        program_len: usize,
    ) -> BacResult<Flow> {
        match op {
            OpCode::BufferDiscard => {
                self.buffer.pop()?;
            }
            OpCode::Exit => return Ok(Flow::Exit),
            OpCode::FeedFinalize => {
                let completion = self.feeding.completion()?;
                self.complete(completion, natives)?;
                self.feeding.discard()?;
            }
            OpCode::FeedBegin => {
                self.feeding.begin(required(op, argument)?)?;
            }
            OpCode::DeleteVariable => {
                let name = required(op, argument)?;
                if !self.scopes.delete(name) {
                    debug!(name, "delete of unbound variable ignored");
                }
            }
            OpCode::Jump => return jump_target(argument, program_len).map(Flow::Jump),
            OpCode::PopRefeed => {
                let value = self.buffer.pop()?;
                self.feed_token(op, &value)?;
            }
            OpCode::FeedToken => self.feed_token(op, argument)?,
            OpCode::ScopeInit => self.scopes.push()?,
            OpCode::ScopeFinalize => self.scopes.pop()?,
            OpCode::LoadVariable => {
                let rendered = self.scopes.get(argument)?.render();
                self.buffer.push(rendered)?;
            }
            OpCode::ReadingInvert => self.reading.invert()?,
            OpCode::ReadingClose => {
                self.reading.close()?;
            }
        }
        Ok(Flow::Next)
    }

    fn feed_token(&mut self, op: OpCode, token: &str) -> BacResult<()> {
        self.feeding.feed(required(op, token)?)
    }

    /// Apply the effect of a completed feeder
    fn complete(&mut self, completion: Completion, natives: &NativeRegistry) -> BacResult<()> {
        match completion {
            Completion::Branch(result) => {
                trace!(result, "reading frame opened");
                self.reading.push(result);
            }
            Completion::Call { name, arguments } => {
                let native = natives.get(&name)?;
                debug!(native = %name, argc = arguments.len(), "calling native");
                let result = native(self, &arguments);
                self.buffer.push(result.render())?;
            }
            Completion::Declare { name, value } => {
                trace!(%name, %value, "variable declared");
                self.scopes.put(name, value);
            }
        }
        Ok(())
    }
}

/// Argument of `op`, which must be present and non-empty
fn required(op: OpCode, argument: &str) -> BacResult<&str> {
    if argument.is_empty() {
        return Err(BacError::argument(op.mnemonic(), argument));
    }
    Ok(argument)
}

fn jump_target(argument: &str, program_len: usize) -> BacResult<usize> {
    let target = required(OpCode::Jump, argument)?
        .parse::<i64>()
        .map_err(|_| BacError::argument(OpCode::Jump.mnemonic(), argument))?;
    usize::try_from(target)
        .ok()
        .filter(|target| *target < program_len)
        .ok_or_else(|| BacError::argument(OpCode::Jump.mnemonic(), argument))
}

/// BacVM Virtual Machine
#[derive(Debug)]
pub struct VirtualMachine {
    config: VmConfig,
    state: ExecutionState,
    natives: NativeRegistry,

    instructions: Vec<Instruction>,
    pc: usize,

    halted: bool,
}

impl VirtualMachine {
    /// Create a new VM instance
    pub fn new(config: VmConfig, instructions: Vec<Instruction>, natives: NativeRegistry) -> Self {
        VirtualMachine {
            state: ExecutionState::new(&config),
            natives,
            instructions,
            pc: 0,
            halted: false,
            config,
        }
    }

    /// Run the program from the first instruction until it exits, runs off
    /// the end, or fails.
    ///
    /// State from a previous run is discarded first. After the run the
    /// final state stays inspectable through [`VirtualMachine::dump`].
    pub fn run(&mut self) -> BacResult<()> {
        info!(
            version = %version(),
            instructions = self.instructions.len(),
            natives = self.natives.len(),
            "starting run"
        );
        self.state.reset();
        self.pc = 0;
        self.halted = false;

        while !self.halted && self.pc < self.instructions.len() {
            if let Err(err) = self.step() {
                debug!(pc = self.pc, error = %err, "run aborted");
                return Err(err);
            }
        }
        debug!(pc = self.pc, buffered = self.state.buffer.size(), "run finished");
        Ok(())
    }

    /// Execute the instruction under the program counter
    pub fn step(&mut self) -> BacResult<()> {
        let Some(instruction) = self.instructions.get(self.pc) else {
            self.halted = true;
            return Ok(());
        };
        let op = OpCode::from_mnemonic(&instruction.operation)
            .ok_or_else(|| BacError::OperationUnknown(instruction.operation.clone()))?;

        if !op.is_reading_control() && !self.state.reading.current() {
            trace!(pc = self.pc, op = op.mnemonic(), "skipped");
            self.pc += 1;
            return Ok(());
        }

        debug!(pc = self.pc, op = op.mnemonic(), arg = instruction.argument(), "executing");
        let flow = self.state.execute(
            op,
            instruction.argument(),
            &self.natives,
            self.instructions.len(),
        )?;

        match flow {
            Flow::Next => self.pc += 1,
            Flow::Jump(target) => self.pc = target,
            Flow::Exit => {
                self.halted = true;
                self.pc += 1;
            }
        }
        Ok(())
    }

    pub fn program_counter(&self) -> usize {
        self.pc
    }

    /// Whether execution stopped through `ex` or by stepping past the end
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn natives(&self) -> &NativeRegistry {
        &self.natives
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    /// Pop the top buffered value
    pub fn pop_buffer(&mut self) -> BacResult<String> {
        self.state.buffer.pop()
    }

    /// Look a variable up in the current scope chain
    pub fn variable(&self, name: &str) -> BacResult<&Variable> {
        self.state.scopes.get(name)
    }

    /// Snapshot of scopes and buffer for diagnostics
    pub fn dump(&self) -> StateDump {
        StateDump {
            program_counter: self.pc,
            scopes: self
                .state
                .scopes
                .frames()
                .iter()
                .map(|frame| {
                    frame
                        .iter()
                        .map(|(name, value)| (name.clone(), value.clone()))
                        .collect()
                })
                .collect(),
            buffer: self.state.buffer.values().to_vec(),
            reading: self.state.reading.frames().to_vec(),
            feeding_depth: self.state.feeding.depth(),
        }
    }
}

/// Diagnostic snapshot of a VM
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateDump {
    pub program_counter: usize,
    /// Scope bindings, root first
    pub scopes: Vec<BTreeMap<String, Variable>>,
    /// Buffered values, bottom first
    pub buffer: Vec<String>,
    /// Reading gates, outermost first
    pub reading: Vec<bool>,
    pub feeding_depth: usize,
}

impl fmt::Display for StateDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pc: {}", self.program_counter)?;
        for (depth, scope) in self.scopes.iter().enumerate() {
            writeln!(f, "scope {}:", depth)?;
            for (name, value) in scope {
                writeln!(f, "  {} ({}) = {}", name, value.kind().tag(), value)?;
            }
        }
        writeln!(f, "buffer (top last): {:?}", self.buffer)?;
        writeln!(f, "reading: {:?}", self.reading)?;
        write!(f, "feeding depth: {}", self.feeding_depth)
    }
}

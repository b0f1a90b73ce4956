#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BreakpointType {
    Instruction,
    Read,
    Write,
    ReadWrite,
}

impl BreakpointType {
    pub fn as_str(self) -> &'static str {
        match self {
            BreakpointType::Instruction => "Instruction",
            BreakpointType::Read => "Read",
            BreakpointType::Write => "Write",
            BreakpointType::ReadWrite => "ReadWrite",
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Breakpoint {
    pub kind: BreakpointType,
    pub address: u16,
    pub enabled: bool,
    pub auto_delete: bool,
}

/// Insertion-ordered breakpoint table, addressable both by position (for
/// `delete N`) and by address (for hit testing). At most one breakpoint per
/// `(address, kind)` pair.
#[derive(Default)]
pub struct Breakpoints {
    list: Vec<Breakpoint>,
}

impl Breakpoints {
    pub fn add(&mut self, kind: BreakpointType, address: u16) -> Option<&mut Breakpoint> {
        if self
            .list
            .iter()
            .any(|bp| bp.address == address && bp.kind == kind)
        {
            return None;
        }
        self.list.push(Breakpoint {
            kind,
            address,
            enabled: true,
            auto_delete: false,
        });
        self.list.last_mut()
    }

    pub fn at_address(&self, address: u16) -> impl Iterator<Item = &Breakpoint> {
        self.list.iter().filter(move |bp| bp.address == address)
    }

    pub fn remove(&mut self, address: u16, kind: BreakpointType) -> Option<Breakpoint> {
        let index = self
            .list
            .iter()
            .position(|bp| bp.address == address && bp.kind == kind)?;
        Some(self.list.remove(index))
    }

    pub fn remove_at_index(&mut self, index: usize) -> Option<Breakpoint> {
        if index < self.list.len() {
            Some(self.list.remove(index))
        } else {
            None
        }
    }

    pub fn get_at_index_mut(&mut self, index: usize) -> Option<&mut Breakpoint> {
        self.list.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

use log::warn;

/// One queue node: a resident page's VPN plus its links. Nodes live in an
/// arena and are addressed by stable integer handles, so "removal" and
/// "reinsertion" are link reassignment rather than deallocation. Once the
/// frame set is full, replacement only rewrites payloads; node identities
/// are fixed for the rest of the run.
#[derive(Debug)]
struct Node {
    data: u16,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Linear doubly-linked queue for LRU: head = most recent, tail = least
/// recent. `next` walks from head toward tail.
#[derive(Debug, Default)]
pub struct LinearQueue {
    nodes: Vec<Node>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl LinearQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a new node at the head; the tail follows when the list was empty
    pub fn push_front(&mut self, vpn: u16) {
        let handle = self.nodes.len();
        self.nodes.push(Node {
            data: vpn,
            prev: None,
            next: self.head,
        });

        match self.head {
            Some(old) => self.nodes[old].prev = Some(handle),
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
    }

    /// Relink the node holding `vpn` at the head. Already-head is a no-op;
    /// an absent key is logged and ignored.
    pub fn move_to_front(&mut self, vpn: u16) -> bool {
        let Some(head) = self.head else {
            return false;
        };
        if self.nodes[head].data == vpn {
            return true;
        }

        let mut cursor = self.nodes[head].next;
        while let Some(handle) = cursor {
            if self.nodes[handle].data == vpn {
                self.unlink(handle);
                self.nodes[handle].prev = None;
                self.nodes[handle].next = Some(head);
                self.nodes[head].prev = Some(handle);
                self.head = Some(handle);
                return true;
            }
            cursor = self.nodes[handle].next;
        }

        warn!("page 0x{vpn:x} not found in LRU queue, leaving order unchanged");
        false
    }

    /// Payload of the least-recently-used node
    pub fn tail_data(&self) -> Option<u16> {
        self.tail.map(|handle| self.nodes[handle].data)
    }

    /// Overwrite the tail node's payload in place, returning the old value.
    /// The node keeps its position; the usual post-reference touch is what
    /// moves it to the head.
    pub fn replace_tail(&mut self, vpn: u16) -> Option<u16> {
        let handle = self.tail?;
        let old = self.nodes[handle].data;
        self.nodes[handle].data = vpn;
        Some(old)
    }

    fn unlink(&mut self, handle: usize) {
        let prev = self.nodes[handle].prev;
        let next = self.nodes[handle].next;
        if let Some(p) = prev {
            self.nodes[p].next = next;
        }
        if let Some(n) = next {
            self.nodes[n].prev = prev;
        }
        if self.tail == Some(handle) {
            self.tail = prev;
        }
        if self.head == Some(handle) {
            self.head = next;
        }
    }

    /// Payloads from head to tail (test and diagnostic aid)
    pub fn front_to_back(&self) -> Vec<u16> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while let Some(handle) = cursor {
            order.push(self.nodes[handle].data);
            cursor = self.nodes[handle].next;
        }
        order
    }
}

/// Circular doubly-linked ring for FIFO/CLOCK/ECLOCK: the head is the most
/// recently inserted node and `prev` steps toward older insertions.
#[derive(Debug, Default)]
pub struct CircularQueue {
    nodes: Vec<Node>,
    head: Option<usize>,
}

impl CircularQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a node just before the current head and advance the head to
    /// it, making it the freshest entry. A lone node links to itself.
    pub fn push(&mut self, vpn: u16) {
        let handle = self.nodes.len();
        match self.head {
            None => {
                self.nodes.push(Node {
                    data: vpn,
                    prev: Some(handle),
                    next: Some(handle),
                });
            }
            Some(head) => {
                let last = self.nodes[head].prev;
                self.nodes.push(Node {
                    data: vpn,
                    prev: last,
                    next: Some(head),
                });
                self.nodes[head].prev = Some(handle);
                if let Some(last) = last {
                    self.nodes[last].next = Some(handle);
                }
            }
        }
        self.head = Some(handle);
    }

    /// Step the head backwards to the previous (older) node
    pub fn retreat(&mut self) {
        if let Some(head) = self.head {
            self.head = self.nodes[head].prev;
        }
    }

    /// Handle of the current head, for lap detection during sweeps
    pub fn head_handle(&self) -> Option<usize> {
        self.head
    }

    pub fn head_data(&self) -> Option<u16> {
        self.head.map(|handle| self.nodes[handle].data)
    }

    /// Overwrite the head node's payload in place
    pub fn set_head_data(&mut self, vpn: u16) {
        if let Some(head) = self.head {
            self.nodes[head].data = vpn;
        }
    }

    /// Payloads starting at the head and stepping `prev`-wards, oldest
    /// first after the head (test and diagnostic aid)
    pub fn backwards_from_head(&self) -> Vec<u16> {
        let Some(start) = self.head else {
            return Vec::new();
        };
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut cursor = start;
        loop {
            order.push(self.nodes[cursor].data);
            cursor = match self.nodes[cursor].prev {
                Some(prev) => prev,
                None => break,
            };
            if cursor == start {
                break;
            }
        }
        order
    }
}

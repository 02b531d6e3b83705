pub type WriteCallback<E> = Box<dyn FnOnce(Result<(), E>) + Send + 'static>;

pub struct WriteRequest<F, E> {
    pub fragment: F,
    pub callback: WriteCallback<E>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Idle,
    Writing,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriterStats {
    pub completed_writes: usize,
    pub failed_writes: usize,
}

use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error};

pub trait Actor: Send + 'static {}

impl<T> Actor for T where T: Send + 'static {}

pub trait Message: Send + 'static {
    type Response: Send + 'static;
}

/// Per-actor state visible to handlers.
///
/// The context only holds a weak reference to the mailbox, so an actor whose
/// external refs are all dropped still shuts down.
pub struct ActorContext<A: Actor> {
    stop_requested: bool,
    mailbox: mpsc::WeakUnboundedSender<Box<dyn Envelope<A>>>,
}

impl<A: Actor> ActorContext<A> {
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Returns a ref to this actor, or `None` once every external ref is gone.
    pub fn actor_ref(&self) -> Option<ActorRef<A>> {
        self.mailbox.upgrade().map(|tx| ActorRef { tx })
    }

    /// Weak ref for background tasks that must not keep the actor alive.
    pub fn weak_ref(&self) -> WeakActorRef<A> {
        WeakActorRef {
            tx: self.mailbox.clone(),
        }
    }
}

/// Handlers are synchronous: one message runs to completion before the next
/// one is taken from the mailbox.
pub trait Handler<M>: Actor + Sized
where
    M: Message,
{
    fn handle(&mut self, message: M, ctx: &mut ActorContext<Self>) -> M::Response;
}

trait Envelope<A: Actor>: Send + 'static {
    fn deliver(self: Box<Self>, actor: &mut A, ctx: &mut ActorContext<A>);
}

struct CastEnvelope<M, A> {
    message: M,
    _marker: PhantomData<fn() -> A>,
}

impl<M, A> Envelope<A> for CastEnvelope<M, A>
where
    M: Message<Response = ()>,
    A: Handler<M>,
{
    fn deliver(self: Box<Self>, actor: &mut A, ctx: &mut ActorContext<A>) {
        actor.handle(self.message, ctx);
    }
}

struct CallEnvelope<M: Message, A> {
    message: M,
    reply: oneshot::Sender<M::Response>,
    _marker: PhantomData<fn() -> A>,
}

impl<M, A> Envelope<A> for CallEnvelope<M, A>
where
    M: Message,
    A: Handler<M>,
{
    fn deliver(self: Box<Self>, actor: &mut A, ctx: &mut ActorContext<A>) {
        let response = actor.handle(self.message, ctx);
        let _ = self.reply.send(response);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastError {
    MailboxClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallError {
    MailboxClosed,
    Timeout,
    ActorStopped,
}

pub struct ActorRef<A: Actor> {
    tx: mpsc::UnboundedSender<Box<dyn Envelope<A>>>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<A: Actor> ActorRef<A> {
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn downgrade(&self) -> WeakActorRef<A> {
        WeakActorRef {
            tx: self.tx.downgrade(),
        }
    }

    pub fn cast<M>(&self, message: M) -> Result<(), CastError>
    where
        M: Message<Response = ()>,
        A: Handler<M>,
    {
        let envelope: Box<dyn Envelope<A>> = Box::new(CastEnvelope::<M, A> {
            message,
            _marker: PhantomData,
        });
        self.tx.send(envelope).map_err(|_| CastError::MailboxClosed)
    }

    pub async fn call<M>(&self, message: M, timeout: Duration) -> Result<M::Response, CallError>
    where
        M: Message,
        A: Handler<M>,
    {
        let (reply, response_rx) = oneshot::channel();
        let envelope: Box<dyn Envelope<A>> = Box::new(CallEnvelope::<M, A> {
            message,
            reply,
            _marker: PhantomData,
        });
        self.tx
            .send(envelope)
            .map_err(|_| CallError::MailboxClosed)?;
        match tokio::time::timeout(timeout, response_rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(CallError::ActorStopped),
            Err(_) => Err(CallError::Timeout),
        }
    }
}

pub struct WeakActorRef<A: Actor> {
    tx: mpsc::WeakUnboundedSender<Box<dyn Envelope<A>>>,
}

impl<A: Actor> Clone for WeakActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<A: Actor> WeakActorRef<A> {
    pub fn upgrade(&self) -> Option<ActorRef<A>> {
        self.tx.upgrade().map(|tx| ActorRef { tx })
    }
}

/// Spawns `actor` behind an unbounded mailbox.
///
/// The actor exits when a handler calls [`ActorContext::stop`], when a
/// handler panics, or when every [`ActorRef`] has been dropped.
pub fn spawn_actor_named<A: Actor>(actor: A, name: &str) -> (ActorRef<A>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel::<Box<dyn Envelope<A>>>();
    let ctx = ActorContext {
        stop_requested: false,
        mailbox: tx.downgrade(),
    };
    let join = crate::spawn(run_mailbox(name.to_string(), actor, ctx, rx));
    (ActorRef { tx }, join)
}

async fn run_mailbox<A: Actor>(
    name: String,
    mut actor: A,
    mut ctx: ActorContext<A>,
    mut rx: mpsc::UnboundedReceiver<Box<dyn Envelope<A>>>,
) {
    debug!(actor = %name, "actor started");
    while let Some(envelope) = rx.recv().await {
        let delivered = catch_unwind(AssertUnwindSafe(|| envelope.deliver(&mut actor, &mut ctx)));
        if delivered.is_err() {
            error!(actor = %name, "actor handler panicked, stopping mailbox");
            break;
        }
        if ctx.is_stop_requested() {
            break;
        }
    }
    debug!(actor = %name, "actor stopped");
}

//! Call messages accepted by the greet server.

use crate::framework::{CallContext, CallRequest, Reply, StreamSender, Streaming};
use crate::model::{GreetRequest, GreetResponse};

pub const GREET: &str = "Greet";
pub const GREET_MANY_TIMES: &str = "GreetManyTimes";
pub const LONG_GREET: &str = "LongGreet";
pub const GREET_EVERYONE: &str = "GreetEveryone";
pub const GREET_WITH_DEADLINE: &str = "GreetWithDeadline";

/// One greet call, one variant per interaction shape demo.
pub enum GreetCall {
    Greet {
        ctx: CallContext,
        request: GreetRequest,
        respond_to: Reply<GreetResponse>,
    },
    GreetManyTimes {
        ctx: CallContext,
        request: GreetRequest,
        responses: StreamSender<GreetResponse>,
    },
    LongGreet {
        ctx: CallContext,
        requests: Streaming<GreetRequest>,
        respond_to: Reply<GreetResponse>,
    },
    GreetEveryone {
        ctx: CallContext,
        requests: Streaming<GreetRequest>,
        responses: StreamSender<GreetResponse>,
    },
    GreetWithDeadline {
        ctx: CallContext,
        request: GreetRequest,
        respond_to: Reply<GreetResponse>,
    },
}

impl CallRequest for GreetCall {
    fn context(&self) -> &CallContext {
        match self {
            GreetCall::Greet { ctx, .. }
            | GreetCall::GreetManyTimes { ctx, .. }
            | GreetCall::LongGreet { ctx, .. }
            | GreetCall::GreetEveryone { ctx, .. }
            | GreetCall::GreetWithDeadline { ctx, .. } => ctx,
        }
    }
}

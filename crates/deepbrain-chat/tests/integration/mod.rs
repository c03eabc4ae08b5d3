mod ask;
mod conversation;

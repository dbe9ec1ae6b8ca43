mod batch;
mod documents;

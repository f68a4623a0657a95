mod document_flow;
mod refresh_coordination;

mod mock_lifecycle;
mod store_merge;
